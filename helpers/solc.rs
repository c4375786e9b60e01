//! Driver for an external `solc`-compatible compiler.
//!
//! Compilation is delegated entirely to the compiler binary through its
//! standard-JSON interface: sources go in keyed by base name, ABI and
//! creation bytecode come back per emitted contract. The binary defaults to
//! `solc` on `PATH` and can be overridden with the `SOLC` environment
//! variable.

use std::{
    collections::BTreeMap,
    io::{self, Write},
    process::{Command, Stdio},
};

use alloy_json_abi::JsonAbi;
use serde::{Deserialize, Serialize};

/// Environment variable naming the compiler binary.
pub const SOLC_ENV: &str = "SOLC";

#[derive(Debug, thiserror::Error)]
pub enum SolcError {
    #[error("failed to run {binary}: {source}")]
    Launch {
        binary: String,
        source: io::Error,
    },
    #[error("compiler exited with {status}: {stderr}")]
    Exited {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("compiler produced invalid JSON: {0}")]
    BadOutput(#[from] serde_json::Error),
    #[error("compilation failed:\n{0}")]
    Compile(String),
}

/// Standard-JSON compiler input. Only the fields this scaffold needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardJsonInput {
    language: &'static str,
    sources: BTreeMap<String, SourceFile>,
    settings: Settings,
}

#[derive(Debug, Serialize)]
struct SourceFile {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Settings {
    output_selection: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl StandardJsonInput {
    /// Builds an input requesting the ABI and creation bytecode for every
    /// contract in the given sources, keyed by source base name.
    pub fn new(sources: BTreeMap<String, String>) -> Self {
        let mut selection = BTreeMap::new();
        selection.insert(
            "*".to_string(),
            BTreeMap::from([(
                "*".to_string(),
                vec!["abi".to_string(), "evm.bytecode.object".to_string()],
            )]),
        );
        Self {
            language: "Solidity",
            sources: sources
                .into_iter()
                .map(|(name, content)| (name, SourceFile { content }))
                .collect(),
            settings: Settings {
                output_selection: selection,
            },
        }
    }
}

/// Standard-JSON compiler output, reduced to diagnostics and contracts.
#[derive(Debug, Deserialize)]
pub struct StandardJsonOutput {
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
    /// source name -> contract name -> compiled contract
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, CompiledContract>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: String,
    pub message: String,
    #[serde(default)]
    pub formatted_message: Option<String>,
}

impl Diagnostic {
    fn render(&self) -> &str {
        self.formatted_message.as_deref().unwrap_or(&self.message)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompiledContract {
    pub abi: JsonAbi,
    pub evm: EvmOutput,
}

#[derive(Debug, Deserialize)]
pub struct EvmOutput {
    pub bytecode: BytecodeOutput,
}

#[derive(Debug, Deserialize)]
pub struct BytecodeOutput {
    /// Unprefixed hex of the creation bytecode.
    pub object: String,
}

impl StandardJsonOutput {
    /// Parses raw compiler output and fails on any error-severity diagnostic.
    /// Warnings are logged and otherwise ignored.
    pub fn parse(raw: &str) -> Result<Self, SolcError> {
        let out: Self = serde_json::from_str(raw)?;
        let errors: Vec<&Diagnostic> = out
            .errors
            .iter()
            .filter(|d| d.severity == "error")
            .collect();
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(|d| d.render())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(SolcError::Compile(joined));
        }
        for diagnostic in out.errors.iter().filter(|d| d.severity == "warning") {
            tracing::warn!("{}", diagnostic.render());
        }
        Ok(out)
    }

    /// Iterates over every top-level contract the compiler emitted,
    /// regardless of which source it came from.
    pub fn emitted_contracts(&self) -> impl Iterator<Item = (&str, &CompiledContract)> {
        self.contracts
            .values()
            .flat_map(|contracts| contracts.iter().map(|(name, c)| (name.as_str(), c)))
    }
}

/// Compiles the given sources with the external compiler binary.
pub fn compile(sources: BTreeMap<String, String>) -> Result<StandardJsonOutput, SolcError> {
    let binary = std::env::var(SOLC_ENV).unwrap_or_else(|_| "solc".to_string());
    let input = StandardJsonInput::new(sources);

    let mut child = Command::new(&binary)
        .arg("--standard-json")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| SolcError::Launch {
            binary: binary.clone(),
            source,
        })?;

    // stdin is piped above, so take() cannot return None
    if let Some(mut stdin) = child.stdin.take() {
        let payload = serde_json::to_vec(&input)?;
        stdin
            .write_all(&payload)
            .map_err(|source| SolcError::Launch {
                binary: binary.clone(),
                source,
            })?;
    }

    let output = child
        .wait_with_output()
        .map_err(|source| SolcError::Launch {
            binary,
            source,
        })?;
    if !output.status.success() {
        return Err(SolcError::Exited {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    StandardJsonOutput::parse(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_OUTPUT: &str = r#"{
        "contracts": {
            "Storage": {
                "Storage": {
                    "abi": [
                        {"type":"function","name":"retrieve","inputs":[],"outputs":[{"name":"","type":"uint256","internalType":"uint256"}],"stateMutability":"view"}
                    ],
                    "evm": {"bytecode": {"object": "6080604052"}}
                }
            }
        },
        "errors": [
            {"severity": "warning", "message": "SPDX license identifier not provided"}
        ]
    }"#;

    const FAILED_OUTPUT: &str = r#"{
        "errors": [
            {"severity": "error", "message": "expected ';'", "formattedMessage": "ParserError: expected ';'\n --> Storage.sol:5:1"},
            {"severity": "warning", "message": "unused variable"}
        ]
    }"#;

    #[test]
    fn parses_emitted_contracts() {
        let out = StandardJsonOutput::parse(OK_OUTPUT).unwrap();
        let emitted: Vec<_> = out.emitted_contracts().collect();
        assert_eq!(emitted.len(), 1);
        let (name, contract) = emitted[0];
        assert_eq!(name, "Storage");
        assert_eq!(contract.evm.bytecode.object, "6080604052");
        assert!(contract.abi.functions.contains_key("retrieve"));
    }

    #[test]
    fn error_severity_aborts_the_run() {
        let err = StandardJsonOutput::parse(FAILED_OUTPUT).unwrap_err();
        match err {
            SolcError::Compile(message) => assert!(message.contains("ParserError")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn warnings_alone_do_not_abort() {
        assert!(StandardJsonOutput::parse(OK_OUTPUT).is_ok());
    }

    #[test]
    fn input_requests_abi_and_bytecode() {
        let input = StandardJsonInput::new(BTreeMap::from([(
            "Storage".to_string(),
            "contract Storage {}".to_string(),
        )]));
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["language"], "Solidity");
        assert_eq!(json["sources"]["Storage"]["content"], "contract Storage {}");
        let selected = &json["settings"]["outputSelection"]["*"]["*"];
        assert_eq!(selected[0], "abi");
        assert_eq!(selected[1], "evm.bytecode.object");
    }
}
