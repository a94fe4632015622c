//! Engagement rules
//!
//! A rule pairs a survey trigger (question id plus an optional numeric
//! emote comparison) with exactly one action. Rules are only appended or
//! removed, and serialize in list order to a `<cepRules>` document.

pub mod import;
pub mod templates;
pub mod xml;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EditError, EditResult};

pub use import::from_xml;
pub use xml::{XmlOptions, to_xml};

pub const DEFAULT_FILE_NAME: &str = "engagement_rules.xml";
pub const DEFAULT_TIME_WINDOW: u32 = 5;
pub const DEFAULT_VALIDITY_PERIOD: &str = "5";

/// Comparison operators understood by the event engine for `emoteNumericValue`
pub const OPERATORS: &[(&str, &str)] = &[
    ("eq", "Equal to"),
    ("nEq", "Not equal to"),
    ("gd", "Greater than"),
    ("ld", "Less than"),
    ("gdOrEq", "Greater than or equal to"),
    ("ldOrEq", "Less than or equal to"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleParams {
    pub question_id: String,
    pub use_join_param: bool,
    pub operator: String,
    pub value: String,
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            question_id: String::new(),
            use_join_param: true,
            operator: "gd".to_string(),
            value: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAction {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsAction {
    pub sms_to: String,
    pub sms_body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentAction {
    pub workflow_id: String,
    pub name: String,
    pub assignee: String,
    pub incident_type: String,
    pub priority: String,
    pub status: String,
    pub description: String,
    pub custom_fields: Vec<CustomFieldValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleAction {
    Email(EmailAction),
    Sms(SmsAction),
    Incident(IncidentAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Email,
    Sms,
    Incident,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Email => "email",
            ActionKind::Sms => "sms",
            ActionKind::Incident => "incident",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "email" => Some(ActionKind::Email),
            "sms" => Some(ActionKind::Sms),
            "incident" => Some(ActionKind::Incident),
            _ => None,
        }
    }

    /// An action of this kind with every field blank
    pub fn empty_action(&self) -> RuleAction {
        match self {
            ActionKind::Email => RuleAction::Email(EmailAction::default()),
            ActionKind::Sms => RuleAction::Sms(SmsAction::default()),
            ActionKind::Incident => RuleAction::Incident(IncidentAction::default()),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RuleAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            RuleAction::Email(_) => ActionKind::Email,
            RuleAction::Sms(_) => ActionKind::Sms,
            RuleAction::Incident(_) => ActionKind::Incident,
        }
    }

    /// Check the fields the event engine cannot do without
    pub fn validate(&self) -> EditResult<()> {
        match self {
            RuleAction::Email(email) => {
                require(&email.to, "Email recipient")?;
                require(&email.subject, "Email subject")?;
            }
            RuleAction::Sms(sms) => {
                require(&sms.sms_to, "SMS recipient")?;
                require(&sms.sms_body, "SMS body")?;
            }
            RuleAction::Incident(incident) => {
                require(&incident.workflow_id, "Workflow ID")?;
            }
        }
        Ok(())
    }

    /// One-line summary for listings
    pub fn summary(&self) -> String {
        match self {
            RuleAction::Email(email) => format!("email to {} ({})", email.to, email.subject),
            RuleAction::Sms(sms) => format!("sms to {}", sms.sms_to),
            RuleAction::Incident(incident) => format!("incident in {}", incident.workflow_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: i64,
    pub time_window: u32,
    pub params: RuleParams,
    pub action: RuleAction,
    pub validity_period: Option<String>,
}

impl Rule {
    pub fn new(id: i64, kind: ActionKind) -> Self {
        Self {
            id,
            time_window: DEFAULT_TIME_WINDOW,
            params: RuleParams::default(),
            action: kind.empty_action(),
            validity_period: Some(DEFAULT_VALIDITY_PERIOD.to_string()),
        }
    }

    pub fn validate(&self) -> EditResult<()> {
        require(&self.params.question_id, "Question ID")?;
        self.action.validate()
    }
}

/// Ordered rule list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
    #[serde(default = "default_enforce_unique_ids")]
    enforce_unique_ids: bool,
}

fn default_enforce_unique_ids() -> bool {
    true
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            enforce_unique_ids: true,
        }
    }

    /// Allow several rules to share an id
    pub fn permissive(mut self) -> Self {
        self.enforce_unique_ids = false;
        self
    }

    pub fn with_unique_ids(mut self, enforce: bool) -> Self {
        self.enforce_unique_ids = enforce;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate a draft and append a copy of it
    pub fn add_rule(&mut self, draft: &Rule) -> EditResult<()> {
        draft.validate()?;
        if self.enforce_unique_ids && self.rules.iter().any(|r| r.id == draft.id) {
            return Err(EditError::DuplicateRuleId(draft.id));
        }

        self.rules.push(draft.clone());
        info!("Added rule {} ({})", draft.id, draft.action.kind());
        Ok(())
    }

    pub fn remove_rule(&mut self, index: usize) -> EditResult<Rule> {
        if index >= self.rules.len() {
            return Err(EditError::RuleOutOfRange(index));
        }
        let removed = self.rules.remove(index);
        debug!("Removed rule {}", removed.id);
        Ok(removed)
    }

    /// Serialize every rule in list order
    pub fn serialize_all(&self, options: &XmlOptions) -> String {
        to_xml(&self.rules, options)
    }

    /// Serialize for download or clipboard; an empty set is refused
    pub fn export(&self, options: &XmlOptions) -> EditResult<String> {
        if self.rules.is_empty() {
            return Err(EditError::NoRules);
        }
        Ok(self.serialize_all(options))
    }

    /// Largest id in use plus one
    pub fn next_id(&self) -> i64 {
        self.rules.iter().map(|r| r.id).max().map_or(1, |id| id + 1)
    }
}

/// Rule set plus the draft currently being edited
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    pub set: RuleSet,
    pub draft: Rule,
}

impl RuleBuilder {
    pub fn new(set: RuleSet) -> Self {
        let draft = Rule::new(set.next_id(), ActionKind::Email);
        Self { set, draft }
    }

    /// Append the draft; on success the next draft gets `id + 1`, a blank
    /// question id and a blank action of the same kind.
    pub fn add_rule(&mut self) -> EditResult<()> {
        self.set.add_rule(&self.draft)?;

        let kind = self.draft.action.kind();
        self.draft.id += 1;
        self.draft.params.question_id.clear();
        self.draft.action = kind.empty_action();
        self.draft.validity_period = Some(DEFAULT_VALIDITY_PERIOD.to_string());
        Ok(())
    }

    pub fn set_action_kind(&mut self, kind: ActionKind) {
        if self.draft.action.kind() != kind {
            self.draft.action = kind.empty_action();
        }
    }
}

fn require(value: &str, field: &'static str) -> EditResult<()> {
    if value.trim().is_empty() {
        Err(EditError::MissingField(field))
    } else {
        Ok(())
    }
}
