use std::io::Write;

/// Where confirmations and error messages go
pub trait Reporter {
    fn report(&mut self, lines: &[String]);
    fn report_error(&mut self, message: &str);
}

/// Writes reports to stdout and errors to stderr
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, lines: &[String]) {
        let mut out = std::io::stdout().lock();
        for line in lines {
            // A closed stdout is not worth aborting over
            let _ = writeln!(out, "{}", line);
        }
    }

    fn report_error(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Collects reports in memory
#[derive(Debug, Default)]
pub struct BufferReporter {
    pub lines: Vec<String>,
    pub errors: Vec<String>,
}

impl Reporter for BufferReporter {
    fn report(&mut self, lines: &[String]) {
        self.lines.extend(lines.iter().cloned());
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
