//! Line menu commands
//!
//! Each input line parses into one [`Command`]; applying it edits the
//! engine's control register or prints engine state.

use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use wavecho_dsp::{EchoParams, EqGains, FilterSettings};
use wavecho_engine::{Engine, PlotPoint};

pub const HELP: &str = "\
commands:
  file <path>                      select the input WAV file
  play | stop                      start or stop playback
  echo on|off                      enable or disable the echo
  echo <delay> <gain> <feedback>   delay in samples, gain and feedback in [0, 1]
  eq on|off                        enable or disable the equalizer
  gains <low> <band> <high>        per-band equalizer gains
  volume <B>                       equalizer output gain in (0, 1]
  filters <fl> <f0> <q> <fh>       redesign the low, band and high filters
  plot                             print the equalizer response
  status                           print render progress
  help                             show this text
  quit                             shut down and exit";

/// Rows printed by `plot`
const PLOT_ROWS: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    File(PathBuf),
    Play,
    Stop,
    EchoEnabled(bool),
    Echo(EchoParams),
    EqEnabled(bool),
    Gains(EqGains),
    Volume(f64),
    Filters(FilterSettings),
    Plot,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse one menu line; `None` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name, args) {
            ("file", []) => bail!("usage: file <path>"),
            ("file", _) => Self::File(PathBuf::from(args.join(" "))),
            ("play", []) => Self::Play,
            ("stop", []) => Self::Stop,
            ("echo", [toggle]) => Self::EchoEnabled(parse_toggle(toggle)?),
            ("echo", [delay, gain, feedback]) => Self::Echo(EchoParams {
                delay_samples: number(delay, "delay")?,
                gain: number(gain, "gain")?,
                feedback: number(feedback, "feedback")?,
            }),
            ("eq", [toggle]) => Self::EqEnabled(parse_toggle(toggle)?),
            ("gains", [low, band, high]) => Self::Gains(EqGains {
                low: number(low, "low gain")?,
                band: number(band, "band gain")?,
                high: number(high, "high gain")?,
            }),
            ("volume", [gain]) => Self::Volume(number(gain, "volume")?),
            ("filters", [low, center, q, high]) => Self::Filters(FilterSettings {
                low_cutoff_hz: number(low, "low cutoff")?,
                band_center_hz: number(center, "band center")?,
                band_q: number(q, "Q")?,
                high_cutoff_hz: number(high, "high cutoff")?,
            }),
            ("plot", []) => Self::Plot,
            ("status", []) => Self::Status,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit" | "q", []) => Self::Quit,
            _ => bail!("unrecognised command '{}' (try 'help')", line.trim()),
        };
        Ok(Some(command))
    }

    /// Apply the command; returns the text to print, if any
    pub fn apply(&self, engine: &Engine) -> Result<Option<String>> {
        let control = engine.register();
        match self {
            Self::File(path) => control.set_input_path(path),
            Self::Play => control.set_play(true),
            Self::Stop => control.request_stop(),
            Self::EchoEnabled(on) => control.set_echo_enabled(*on),
            Self::Echo(params) => control.set_echo_params(*params)?,
            Self::EqEnabled(on) => control.set_eq_enabled(*on),
            Self::Gains(gains) => control.set_eq_gains(*gains)?,
            Self::Volume(gain) => control.set_eq_output_gain(*gain)?,
            Self::Filters(settings) => control.set_filter_settings(settings)?,
            Self::Plot => return Ok(Some(render_plot(&engine.plot()))),
            Self::Status => {
                let status = engine.status();
                let mut text = format!(
                    "{}: {} frames in {} blocks",
                    status.state, status.frames_rendered, status.blocks_written
                );
                if let Some(err) = status.last_error {
                    text.push_str(&format!(" (last error: {err})"));
                }
                return Ok(Some(text));
            }
            Self::Help => return Ok(Some(HELP.to_string())),
            Self::Quit => {}
        }
        Ok(None)
    }
}

fn parse_toggle(word: &str) -> Result<bool> {
    match word {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        other => Err(anyhow!("expected on or off, got '{other}'")),
    }
}

fn number<T>(word: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    word.parse()
        .with_context(|| format!("invalid {what} '{word}'"))
}

/// Downsample the curve to a few rows with a bar per row
fn render_plot(points: &[PlotPoint]) -> String {
    if points.is_empty() {
        return "no response data".to_string();
    }

    let step = (points.len() / PLOT_ROWS).max(1);
    let mut rows = Vec::with_capacity(PLOT_ROWS);
    for point in points.iter().step_by(step) {
        // one column per 2 dB, centred on 0 dB
        let offset = (point.magnitude_db / 2.0).round() as i32;
        let bar = if offset >= 0 {
            format!("{:>20}|{}", "", "#".repeat(offset as usize))
        } else {
            let len = offset.unsigned_abs() as usize;
            format!("{:>20}|", "#".repeat(len))
        };
        rows.push(format!(
            "{:>9.1} Hz {:>7.2} dB {}",
            point.frequency_hz, point.magnitude_db, bar
        ));
    }
    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn parses_transport_commands() {
        assert_eq!(parse("play"), Command::Play);
        assert_eq!(parse("  stop  "), Command::Stop);
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(
            parse("file my song.wav"),
            Command::File(PathBuf::from("my song.wav"))
        );
        assert!(Command::parse("   ").unwrap().is_none());
    }

    #[test]
    fn parses_effect_parameters() {
        assert_eq!(parse("echo on"), Command::EchoEnabled(true));
        assert_eq!(parse("eq off"), Command::EqEnabled(false));
        assert_eq!(
            parse("echo 11025 0.5 0.25"),
            Command::Echo(EchoParams {
                delay_samples: 11_025,
                gain: 0.5,
                feedback: 0.25,
            })
        );
        assert_eq!(
            parse("gains 1 -0.5 2"),
            Command::Gains(EqGains {
                low: 1.0,
                band: -0.5,
                high: 2.0,
            })
        );
        assert_eq!(parse("volume 0.8"), Command::Volume(0.8));
        assert_eq!(
            parse("filters 250 1200 0.7 5000"),
            Command::Filters(FilterSettings {
                low_cutoff_hz: 250.0,
                band_center_hz: 1200.0,
                band_q: 0.7,
                high_cutoff_hz: 5000.0,
            })
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["echo maybe", "echo 1 2", "echo -1 0.5 0.5", "gains a b c", "volume", "file", "dance"] {
            assert!(Command::parse(line).is_err(), "accepted '{line}'");
        }
    }

    #[test]
    fn plot_has_bounded_rows() {
        let points: Vec<PlotPoint> = (0..512)
            .map(|i| PlotPoint {
                frequency_hz: 1.0 + f64::from(i),
                magnitude_db: if i < 256 { 6.0 } else { -6.0 },
            })
            .collect();

        let text = render_plot(&points);
        assert_eq!(text.lines().count(), PLOT_ROWS);
        assert!(text.lines().next().unwrap().ends_with("|###"));
        assert!(text.lines().last().unwrap().contains("###|"));
        assert_eq!(render_plot(&[]), "no response data");
    }
}
