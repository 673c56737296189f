//! Interactive mapping surface: asks for each speaker's voice on a terminal.

use crate::defaults;
use crate::error::{DubshError, Result};
use crate::mapping::editor::{ControlKind, MappingLayout, MappingSurface};
use crate::mapping::preset::PresetSurface;
use std::io::{BufRead, Write};

/// Prompts over any reader/writer pair and stores answers in a
/// [`PresetSurface`].
///
/// Accepted answers for choice controls: blank (automatic, or the first voice
/// when no automatic option is offered), an option number, or a voice name.
/// End of input keeps the remaining controls at their initial value.
pub struct PromptSurface<R: BufRead, W: Write> {
    input: R,
    output: W,
    values: PresetSurface,
}

impl<R: BufRead, W: Write> PromptSurface<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            values: PresetSurface::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn print_options(&mut self, options: &[String], auto: bool) -> Result<()> {
        writeln!(self.output, "Available voices:")?;
        if auto {
            writeln!(self.output, "  {:>2}) {}", 0, defaults::AUTO_CHOICE_LABEL)?;
        }
        for (idx, voice) in options.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {}", idx + 1, voice)?;
        }
        Ok(())
    }

    fn ask(&mut self, speaker: &str, kind: &ControlKind) -> Result<()> {
        loop {
            let default = match kind.initial_value() {
                "" => "auto",
                v => v,
            };
            write!(self.output, "Voice for {speaker} [{default}]: ")?;
            self.output.flush()?;

            let Some(answer) = self.read_answer()? else {
                writeln!(self.output)?;
                return Ok(());
            };
            if answer.is_empty() {
                return Ok(());
            }

            let value = match kind {
                ControlKind::Choice { options, auto } => match answer.parse::<usize>() {
                    Ok(0) if *auto => String::new(),
                    Ok(n) if n >= 1 && n <= options.len() => options[n - 1].clone(),
                    Ok(_) => {
                        writeln!(self.output, "No voice numbered {answer}")?;
                        continue;
                    }
                    Err(_) => answer,
                },
                ControlKind::FreeText => answer,
            };

            match self.values.set(speaker, &value) {
                Ok(()) => return Ok(()),
                Err(DubshError::UnknownVoice { voice }) => {
                    writeln!(self.output, "Unknown voice '{voice}'")?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead, W: Write> MappingSurface for PromptSurface<R, W> {
    fn render(&mut self, layout: &MappingLayout) -> Result<()> {
        self.values.render(layout)?;

        let controls = match layout {
            MappingLayout::NoSpeakers => {
                writeln!(self.output, "{}", defaults::NO_SPEAKERS_MESSAGE)?;
                return Ok(());
            }
            MappingLayout::Controls(controls) => controls,
        };

        // All controls share one catalog; list it once.
        if let Some(ControlKind::Choice { options, auto }) = controls.first().map(|c| &c.kind) {
            self.print_options(options, *auto)?;
        }
        for control in controls {
            self.ask(&control.speaker, &control.kind)?;
        }
        Ok(())
    }

    fn read_current_values(&self) -> Vec<(String, String)> {
        self.values.read_current_values()
    }
}
