use anyhow::Result;
use stackdiff::DiffOutput;

use std::io::{IsTerminal, Write};

pub struct CliLogger {
    json: bool,
    no_color: bool,
}

impl CliLogger {
    pub fn new(json: bool, no_color: bool) -> Self {
        Self { json, no_color }
    }

    pub fn print_output(&self, output: &DiffOutput) -> Result<()> {
        let stdout = std::io::stdout();
        let is_terminal = stdout.is_terminal();
        write_output(&mut stdout.lock(), output, is_terminal)
    }

    pub fn print_error(&self, msg: &str) {
        if self.json {
            let out = serde_json::json!({
                "status": "error",
                "code": "error",
                "message": msg,
            });
            println!("{out}");
            return;
        }
        eprintln!("{} {msg}", self.style("error", "31;1"));
    }

    fn style(&self, text: &str, ansi: &str) -> String {
        if self.no_color {
            return text.to_string();
        }
        format!("\x1b[{ansi}m{text}\x1b[0m")
    }
}

/// Reports go out as one JSON line; tables keep escapes only when their
/// colour choice allows it for this stream.
fn write_output(out: &mut impl Write, output: &DiffOutput, is_terminal: bool) -> Result<()> {
    match output {
        DiffOutput::Report(report) => {
            serde_json::to_writer(&mut *out, report)?;
            writeln!(out)?;
            out.flush()?;
        }
        DiffOutput::Table { table, color } => {
            table.write(out, !color.keeps_escapes(is_terminal))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackdiff::{
        ColorChoice, DisplayUnit, MetricRecord, Profile, StatColumn, TableSettings,
        render_comparison,
    };

    fn settings(color: ColorChoice) -> TableSettings {
        TableSettings {
            columns: vec![StatColumn::Total],
            unit: DisplayUnit::Ms,
            threshold: 0.0,
            color,
        }
    }

    fn profiles() -> Vec<Profile> {
        let record = |total: i64| MetricRecord {
            fn_name: "main".to_string(),
            total_time: total,
            invocations: 1,
            ..MetricRecord::default()
        };
        vec![
            Profile::new(None, record(4_000_000)),
            Profile::new(None, record(2_000_000)),
        ]
    }

    fn written(output: &DiffOutput, is_terminal: bool) -> String {
        let mut buf = Vec::new();
        write_output(&mut buf, output, is_terminal).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn report_is_a_single_json_line() {
        let output = render_comparison(&profiles(), &settings(ColorChoice::Auto), true);
        let text = written(&output, true);
        assert_eq!(text.lines().count(), 1, "output:\n{text}");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["schemaVersion"], "stackdiff.diff.v1");
        assert_eq!(value["rows"][0]["name"], "main");
    }

    #[test]
    fn table_escapes_follow_colour_choice() {
        let always = render_comparison(&profiles(), &settings(ColorChoice::Always), false);
        assert!(written(&always, false).contains("\x1b[32m"));

        let auto = render_comparison(&profiles(), &settings(ColorChoice::Auto), false);
        assert!(written(&auto, true).contains('\x1b'));
        let piped = written(&auto, false);
        assert!(!piped.contains('\x1b'), "output:\n{piped}");
        assert!(piped.contains("(↓ 100.0%)"), "output:\n{piped}");
    }
}
