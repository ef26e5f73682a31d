use advisor_core::session::Confirm;
use std::io::{self, BufRead, Write};

/// Asks on stderr and reads the answer from stdin. Anything but `y`/`yes` declines.
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                tracing::warn!(error = %err, "could not read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
