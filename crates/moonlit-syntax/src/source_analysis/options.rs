// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parse configuration.
//!
//! [`ParseOptions`] selects the kind of source (a script file or an
//! interactive line) and which grammar features are enabled. The defaults
//! parse a Lua 5.4 script. All option types are plain serde structs so
//! that tools can embed them in their own configuration:
//!
//! ```
//! use moonlit_syntax::source_analysis::{LuaVersion, ParseOptions, SourceKind};
//!
//! let options: ParseOptions = serde_json::from_str(
//!     r#"{ "kind": "interactive", "syntax": { "version": "lua52" } }"#,
//! ).unwrap();
//! assert_eq!(options.kind, SourceKind::Interactive);
//! assert!(options.syntax.goto_statements);
//! assert!(!options.syntax.integer_division);
//! ```

use serde::{Deserialize, Serialize};

/// What kind of source text is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// A script file: a leading `#` line is skipped, bare expressions are
    /// not statements.
    #[default]
    Script,
    /// A line typed at a prompt: no shebang, and a chunk that is exactly
    /// one expression is accepted.
    Interactive,
}

/// A Lua language version, used to pick a preset of [`SyntaxOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LuaVersion {
    /// Lua 5.1
    Lua51,
    /// Lua 5.2: `goto`, labels, `\x` and `\z` escapes.
    Lua52,
    /// Lua 5.3: integer division, bitwise operators, `\u{...}` escapes.
    Lua53,
    /// Lua 5.4: `<const>` and `<close>` local attributes.
    #[default]
    Lua54,
}

impl std::fmt::Display for LuaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lua51 => write!(f, "Lua 5.1"),
            Self::Lua52 => write!(f, "Lua 5.2"),
            Self::Lua53 => write!(f, "Lua 5.3"),
            Self::Lua54 => write!(f, "Lua 5.4"),
        }
    }
}

/// Grammar feature switches.
///
/// Disabled constructs are still lexed and parsed into the tree, but are
/// reported with
/// [`DiagnosticCode::FeatureNotAvailable`](super::DiagnosticCode::FeatureNotAvailable).
/// The one exception is `goto`, which lexes as a plain identifier when
/// `goto_statements` is off, as it does in Lua 5.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "SyntaxOptionsRepr")]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag switches an independent grammar feature"
)]
pub struct SyntaxOptions {
    /// `goto name` and `::label::`
    pub goto_statements: bool,
    /// The `//` operator.
    pub integer_division: bool,
    /// `& | ~ << >>` and unary `~`.
    pub bitwise_operators: bool,
    /// `local x <const>` and `local x <close>`.
    pub local_attributes: bool,
    /// `\xHH` and `\z` string escapes.
    pub hex_escapes_and_skip: bool,
    /// `\u{XXX}` string escapes.
    pub unicode_escapes: bool,
}

impl SyntaxOptions {
    /// Returns the feature set of a Lua version.
    #[must_use]
    pub const fn for_version(version: LuaVersion) -> Self {
        let at_least_52 = !matches!(version, LuaVersion::Lua51);
        let at_least_53 = matches!(version, LuaVersion::Lua53 | LuaVersion::Lua54);
        let at_least_54 = matches!(version, LuaVersion::Lua54);
        Self {
            goto_statements: at_least_52,
            integer_division: at_least_53,
            bitwise_operators: at_least_53,
            local_attributes: at_least_54,
            hex_escapes_and_skip: at_least_52,
            unicode_escapes: at_least_53,
        }
    }
}

impl Default for SyntaxOptions {
    fn default() -> Self {
        Self::for_version(LuaVersion::default())
    }
}

/// Deserialization form of [`SyntaxOptions`]: an optional `version` preset
/// with per-feature overrides on top.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct SyntaxOptionsRepr {
    version: Option<LuaVersion>,
    goto_statements: Option<bool>,
    integer_division: Option<bool>,
    bitwise_operators: Option<bool>,
    local_attributes: Option<bool>,
    hex_escapes_and_skip: Option<bool>,
    unicode_escapes: Option<bool>,
}

impl From<SyntaxOptionsRepr> for SyntaxOptions {
    fn from(repr: SyntaxOptionsRepr) -> Self {
        let base = Self::for_version(repr.version.unwrap_or_default());
        Self {
            goto_statements: repr.goto_statements.unwrap_or(base.goto_statements),
            integer_division: repr.integer_division.unwrap_or(base.integer_division),
            bitwise_operators: repr.bitwise_operators.unwrap_or(base.bitwise_operators),
            local_attributes: repr.local_attributes.unwrap_or(base.local_attributes),
            hex_escapes_and_skip: repr
                .hex_escapes_and_skip
                .unwrap_or(base.hex_escapes_and_skip),
            unicode_escapes: repr.unicode_escapes.unwrap_or(base.unicode_escapes),
        }
    }
}

/// Everything the parser needs to know besides the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ParseOptions {
    /// Script or interactive input.
    pub kind: SourceKind,
    /// Enabled grammar features.
    pub syntax: SyntaxOptions,
}

impl ParseOptions {
    /// Options for a script written for `version`.
    #[must_use]
    pub const fn for_version(version: LuaVersion) -> Self {
        Self {
            kind: SourceKind::Script,
            syntax: SyntaxOptions::for_version(version),
        }
    }

    /// Options for an interactive line in the default Lua version.
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            kind: SourceKind::Interactive,
            ..Self::default()
        }
    }

    /// Replaces the source kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }
}
