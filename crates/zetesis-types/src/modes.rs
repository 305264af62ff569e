//! Search modes, backing models, source types, and the mode/model
//! compatibility table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// High-level query-handling strategy of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Auto,
    Pro,
    Reasoning,
    DeepResearch,
}

impl SearchMode {
    pub fn all() -> &'static [SearchMode] {
        &[
            Self::Auto,
            Self::Pro,
            Self::Reasoning,
            Self::DeepResearch,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Pro => "pro",
            Self::Reasoning => "reasoning",
            Self::DeepResearch => "deep_research",
        }
    }
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::Auto
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "pro" => Ok(Self::Pro),
            "reasoning" => Ok(Self::Reasoning),
            "deep_research" => Ok(Self::DeepResearch),
            other => Err(Error::InvalidParameter(format!(
                "unknown search mode: {other}"
            ))),
        }
    }
}

/// Specific backing model used to generate an answer within a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiModel {
    #[serde(rename = "sonar")]
    Sonar,
    #[serde(rename = "gpt-4.5")]
    Gpt45,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "claude-3.7-sonnet")]
    Claude37Sonnet,
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
    #[serde(rename = "grok-2")]
    Grok2,
    #[serde(rename = "r1")]
    R1,
    #[serde(rename = "o3-mini")]
    O3Mini,
}

impl AiModel {
    /// The reasoning tier of the upstream model table lists
    /// "claude-3.7-sonnet" a second time under this name. Kept as an alias of
    /// [`AiModel::Claude37Sonnet`] so both spellings resolve to the same
    /// model.
    pub const CLAUDE_REASONING: AiModel = AiModel::Claude37Sonnet;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sonar => "sonar",
            Self::Gpt45 => "gpt-4.5",
            Self::Gpt4o => "gpt-4o",
            Self::Claude37Sonnet => "claude-3.7-sonnet",
            Self::Gemini20Flash => "gemini-2.0-flash",
            Self::Grok2 => "grok-2",
            Self::R1 => "r1",
            Self::O3Mini => "o3-mini",
        }
    }
}

impl fmt::Display for AiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AiModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sonar" => Ok(Self::Sonar),
            "gpt-4.5" => Ok(Self::Gpt45),
            "gpt-4o" => Ok(Self::Gpt4o),
            "claude-3.7-sonnet" => Ok(Self::Claude37Sonnet),
            "gemini-2.0-flash" => Ok(Self::Gemini20Flash),
            "grok-2" => Ok(Self::Grok2),
            "r1" => Ok(Self::R1),
            "o3-mini" => Ok(Self::O3Mini),
            other => Err(Error::InvalidParameter(format!("unknown model: {other}"))),
        }
    }
}

/// Category of external reference material the service may cite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Web,
    Scholar,
    Social,
    Reddit,
    Youtube,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Scholar => "scholar",
            Self::Social => "social",
            Self::Reddit => "reddit",
            Self::Youtube => "youtube",
        }
    }
}

impl Default for SourceType {
    fn default() -> Self {
        SourceType::Web
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(Self::Web),
            "scholar" => Ok(Self::Scholar),
            "social" => Ok(Self::Social),
            "reddit" => Ok(Self::Reddit),
            "youtube" => Ok(Self::Youtube),
            other => Err(Error::InvalidParameter(format!(
                "unknown source type: {other}"
            ))),
        }
    }
}

const PRO_MODELS: &[AiModel] = &[
    AiModel::Sonar,
    AiModel::Gpt45,
    AiModel::Gpt4o,
    AiModel::Claude37Sonnet,
    AiModel::Gemini20Flash,
    AiModel::Grok2,
];

const REASONING_MODELS: &[AiModel] = &[AiModel::R1, AiModel::O3Mini, AiModel::CLAUDE_REASONING];

/// Models selectable in the given mode. "No model" is always legal and is
/// represented by passing `None` to [`is_compatible`].
pub fn compatible_models(mode: SearchMode) -> &'static [AiModel] {
    match mode {
        SearchMode::Auto | SearchMode::DeepResearch => &[],
        SearchMode::Pro => PRO_MODELS,
        SearchMode::Reasoning => REASONING_MODELS,
    }
}

/// Whether the (mode, model) pairing is allowed by the static table.
pub fn is_compatible(mode: SearchMode, model: Option<AiModel>) -> bool {
    match model {
        None => true,
        Some(model) => compatible_models(mode).contains(&model),
    }
}
