#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::grade::diagnostics::{DiagnosticSeverity, LintDiagnostic};

peg::parser! {
    /// grammars for the text output of flake8 and pylint.
    pub grammar parser() for str {
        /// matches any sequence of 1 or more numbers
        rule number() -> u32
            = n:$(['0'..='9']+) {? n.parse().or(Err("u32")) }

        /// matches spaces and tabs
        rule whitespace() = quiet!{[' ' | '\t']+}

        /// matches everything up to the first `:<digit>`
        rule path() -> &'input str
            = p:$((!(":" ['0'..='9']) [_])+) { p }

        /// matches a message id such as `E302`, `W0611` or `SIM115`
        rule code() -> &'input str
            = c:$(['A'..='Z']+ ['0'..='9']+) { c }

        /// matches the rest of the line
        rule message() -> &'input str
            = m:$([_]*) { m }

        /// parses `path:line:col: CODE message` (flake8) and
        /// `path:line:col: CODE: message` (pylint text format)
        pub rule finding() -> LintDiagnostic
            = whitespace()? p:path() ":" l:number() ":" c:number() ":"
              whitespace()? code:code() ":"? whitespace()? m:message()
            {
                let name = std::path::Path::new(p)
                    .file_name()
                    .map(|value| value.to_string_lossy().to_string())
                    .unwrap_or_else(|| p.to_string());

                LintDiagnostic::builder()
                    .path(p)
                    .file_name(name)
                    .line_number(l)
                    .column(c)
                    .code(code)
                    .message(m.trim())
                    .severity(DiagnosticSeverity::from_code(code))
                    .build()
            }
    }
}
