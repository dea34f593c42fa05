use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One selectable mood answer: the emoji shown on the button, the label that
/// ends up in the spreadsheet and the background colour of the cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct SentimentOption {
    pub emoji: String,
    pub label: String,
    pub color: String,
}

impl SentimentOption {
    pub fn new(emoji: &str, label: &str, color: &str) -> Self {
        Self {
            emoji: emoji.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        }
    }

    /// Options without a label or colour cannot be answered with and are not
    /// offered as buttons.
    pub fn is_selectable(&self) -> bool {
        !self.label.is_empty() && !self.color.is_empty()
    }

    /// What to show for this option in a message: the emoji, or the label
    /// when no emoji was configured.
    pub fn display(&self) -> &str {
        if self.emoji.is_empty() {
            &self.label
        } else {
            &self.emoji
        }
    }

    /// Parses the `[["😄","Very Happy","#ff6961"], ...]` configuration form.
    pub fn parse_list(json: &str) -> Result<Vec<SentimentOption>, Error> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("BUTTONS is not a list of [emoji, label, color]: {e}")))
    }

    pub fn find<'a>(options: &'a [SentimentOption], label: &str) -> Option<&'a SentimentOption> {
        options.iter().find(|o| o.label == label)
    }
}

impl From<(String, String, String)> for SentimentOption {
    fn from((emoji, label, color): (String, String, String)) -> Self {
        Self { emoji, label, color }
    }
}

impl From<SentimentOption> for (String, String, String) {
    fn from(o: SentimentOption) -> Self {
        (o.emoji, o.label, o.color)
    }
}

/// The options used when nothing is configured.
pub fn default_options() -> Vec<SentimentOption> {
    vec![
        SentimentOption::new("😄", "Very Happy", "#ff6961"),
        SentimentOption::new("🙂", "Happy", "#ffb347"),
        SentimentOption::new("😐", "Neutral", "#fdfd96"),
        SentimentOption::new("🙁", "Sad", "#48d148"),
        SentimentOption::new("😞", "Very Sad", "#779ecb"),
    ]
}
