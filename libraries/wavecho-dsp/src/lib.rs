//! Wavecho DSP
//!
//! Signal processing building blocks for the Wavecho render engine.
//!
//! This crate provides:
//! - Bilinear-transform biquad design for low-pass, band-pass, and high-pass filters
//! - A per-channel biquad runtime (`FilterState`)
//! - A three-band parametric equalizer mixing the filtered bands back into the dry signal
//! - A feedback echo over a one-second circular buffer
//! - Transfer-function evaluation of the equalizer over a logarithmic frequency grid
//!
//! # Example: Equalizing a sample
//!
//! ```rust
//! use wavecho_dsp::equalizer::{Channel, EqGains, ParametricEqualizer};
//! use wavecho_dsp::filter::FilterSettings;
//!
//! let bank = FilterSettings::default().design(44_100.0);
//! let gains = EqGains { low: 2.0, band: 0.0, high: -0.5 };
//!
//! let mut eq = ParametricEqualizer::new();
//! let y = eq.process_sample(1000.0, Channel::Left, &bank, &gains, 0.5);
//! assert!(y.is_finite());
//! ```
//!
//! # Example: Echo
//!
//! ```rust
//! use wavecho_core::StereoFrame;
//! use wavecho_dsp::echo::{EchoEffect, EchoParams};
//!
//! let mut echo = EchoEffect::new(44_100);
//! let params = EchoParams { delay_samples: 2, gain: 0.5, feedback: 0.0 };
//!
//! echo.process(StereoFrame::new(100, 100), &params);
//! echo.process(StereoFrame::SILENCE, &params);
//! let out = echo.process(StereoFrame::SILENCE, &params);
//! assert_eq!(out, StereoFrame::new(100, 100));
//! ```

pub mod echo;
pub mod equalizer;
mod error;
pub mod filter;
pub mod response;

pub use echo::{EchoEffect, EchoParams};
pub use equalizer::{Channel, EqGains, ParametricEqualizer};
pub use error::{DspError, Result};
pub use filter::{BiquadCoefficients, FilterBank, FilterSettings, FilterState};
