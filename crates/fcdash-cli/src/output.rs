//! JSON output on stdout.

use std::io::{self, Write};

use serde::Serialize;

use crate::error::CliError;

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let text = to_json(value, pretty)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pretty_output_is_indented() {
        let value = json!({ "page": "main" });
        assert_eq!(to_json(&value, false).expect("json"), r#"{"page":"main"}"#);
        assert_eq!(
            to_json(&value, true).expect("json"),
            "{\n  \"page\": \"main\"\n}"
        );
    }
}
