//! Serde model of the editable workflow document
//!
//! Field names follow the platform's camelCase keys. Sections this crate
//! does not edit are captured in `extra` maps and written back untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::color::StatusColors;
use super::condition::Condition;
use crate::error::{EditError, EditResult};

fn is_false(value: &bool) -> bool {
    !*value
}

fn enum_kind() -> String {
    "enum".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    /// Customer complaint management
    #[default]
    Ccm,
    /// Online reputation management
    Orm,
    Combined,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::Ccm => "ccm",
            WorkflowType::Orm => "orm",
            WorkflowType::Combined => "combined",
        }
    }

    /// orm and combined workflows carry review platform fields
    pub fn has_reviews(&self) -> bool {
        !matches!(self, WorkflowType::Ccm)
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ccm" => Ok(WorkflowType::Ccm),
            "orm" => Ok(WorkflowType::Orm),
            "combined" => Ok(WorkflowType::Combined),
            other => Err(EditError::UnknownWorkflowType(other.to_string())),
        }
    }
}

/// One option of an enum field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnumValue {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumField {
    pub name: String,
    #[serde(rename = "type", default = "enum_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(default)]
    pub values: Vec<EnumValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnumField {
    pub fn new(name: impl Into<String>, values: Vec<EnumValue>) -> Self {
        Self {
            name: name.into(),
            kind: enum_kind(),
            read_only: None,
            values,
            extra: Map::new(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.iter().any(|v| v.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_initial: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Explicit overrides; derived from the background when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub high_priority_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub editable_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields_validation: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Trigger>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Status {
    /// A status whose id is its name
    pub fn new(name: impl Into<String>, background: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            is_initial: false,
            is_final: false,
            background_color: Some(background.into()),
            text_color: None,
            status_text_color: None,
            status_background_color: None,
            high_priority_fields: Vec::new(),
            editable_fields: Vec::new(),
            fields_validation: Vec::new(),
            triggers: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn colors(&self) -> EditResult<StatusColors> {
        StatusColors::derive(
            self.background_color.as_deref(),
            self.text_color.as_deref(),
            self.status_text_color.as_deref(),
            self.status_background_color.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub source_state: String,
    pub target_states: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusFlow {
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_transitions: Vec<Value>,
}

impl StatusFlow {
    pub fn status(&self, id: &str) -> Option<&Status> {
        self.statuses.iter().find(|s| s.id == id)
    }

    pub fn targets_of(&self, source: &str) -> &[String] {
        self.transitions
            .iter()
            .find(|t| t.source_state == source)
            .map(|t| t.target_states.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum FieldType {
    #[serde(rename = "string")]
    #[value(name = "string")]
    String,
    #[serde(rename = "enum")]
    #[value(name = "enum")]
    Enum,
    #[serde(rename = "multiselect")]
    #[value(name = "multiselect")]
    Multiselect,
    #[serde(rename = "textArea")]
    #[value(name = "textArea")]
    TextArea,
    #[serde(rename = "date")]
    #[value(name = "date")]
    Date,
    #[serde(rename = "file")]
    #[value(name = "file")]
    File,
    #[serde(rename = "number")]
    #[value(name = "number")]
    Number,
    #[serde(rename = "boolean")]
    #[value(name = "boolean")]
    Boolean,
    #[serde(rename = "time_accumulation")]
    #[value(name = "time_accumulation")]
    TimeAccumulation,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Enum => "enum",
            FieldType::Multiselect => "multiselect",
            FieldType::TextArea => "textArea",
            FieldType::Date => "date",
            FieldType::File => "file",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::TimeAccumulation => "time_accumulation",
        }
    }

    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Enum | FieldType::Multiselect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<EnumValue>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: Some(false),
            read_only: Some(false),
            editable: None,
            hidden: None,
            values: field_type.has_options().then(Vec::new),
            extra: Map::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn with_values(mut self, values: Vec<EnumValue>) -> Self {
        self.values = Some(values);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum HeaderKind {
    #[value(name = "customField")]
    CustomField,
    Contact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminHeader {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HeaderKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminHierarchy {
    pub list: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub headers: Vec<AdminHeader>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Admin,
    Customer,
    Employee,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Admin => "admin",
            Target::Customer => "customer",
            Target::Employee => "employee",
        }
    }
}

/// Payload shared by email and SMS notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contact_filters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_user_query: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append_edit_url: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Notification {
    pub fn new(template: impl Into<String>, target: Target) -> Self {
        Self {
            template: template.into(),
            target: Some(target),
            contacts: Vec::new(),
            contact_filters: Vec::new(),
            admin_user_query: None,
            custom_fields: Vec::new(),
            append_edit_url: None,
            condition: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub changing_fields: Vec<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncField {
    pub case_field: String,
    pub loyalty_field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltySync {
    pub sync_fields: Vec<SyncField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCalculation {
    #[serde(default)]
    pub evaluation_fields: Vec<Value>,
    pub changing_field: FieldRef,
    pub evaluation_expression: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

/// Channels whose payload this crate does not interpret
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "camelCase")]
pub enum Trigger {
    Email(Notification),
    Sms(Notification),
    FieldChange(FieldChange),
    FieldChangeRevert(FieldChange),
    LoyaltyFieldSync(LoyaltySync),
    AutomaticEscalationReset(OpaqueTrigger),
    FieldCalculator(FieldCalculation),
    PdfCreation(OpaqueTrigger),
}

impl Trigger {
    pub fn channel(&self) -> &'static str {
        match self {
            Trigger::Email(_) => "email",
            Trigger::Sms(_) => "sms",
            Trigger::FieldChange(_) => "fieldChange",
            Trigger::FieldChangeRevert(_) => "fieldChangeRevert",
            Trigger::LoyaltyFieldSync(_) => "loyaltyFieldSync",
            Trigger::AutomaticEscalationReset(_) => "automaticEscalationReset",
            Trigger::FieldCalculator(_) => "fieldCalculator",
            Trigger::PdfCreation(_) => "pdfCreation",
        }
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Trigger::Email(n) | Trigger::Sms(n) => Some(n),
            _ => None,
        }
    }

    pub fn template(&self) -> Option<&str> {
        match self {
            Trigger::Email(n) | Trigger::Sms(n) => Some(n.template.as_str()),
            Trigger::AutomaticEscalationReset(o) | Trigger::PdfCreation(o) => o.template.as_deref(),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<Target> {
        self.notification().and_then(|n| n.target)
    }

    pub fn condition(&self) -> Option<&Condition> {
        match self {
            Trigger::Email(n) | Trigger::Sms(n) => n.condition.as_ref(),
            Trigger::FieldChange(f) | Trigger::FieldChangeRevert(f) => f.condition.as_ref(),
            Trigger::LoyaltyFieldSync(l) => l.condition.as_ref(),
            Trigger::FieldCalculator(c) => c.condition.as_ref(),
            Trigger::AutomaticEscalationReset(o) | Trigger::PdfCreation(o) => o.condition.as_ref(),
        }
    }

    pub fn set_condition(&mut self, condition: Option<Condition>) {
        let slot = match self {
            Trigger::Email(n) | Trigger::Sms(n) => &mut n.condition,
            Trigger::FieldChange(f) | Trigger::FieldChangeRevert(f) => &mut f.condition,
            Trigger::LoyaltyFieldSync(l) => &mut l.condition,
            Trigger::FieldCalculator(c) => &mut c.condition,
            Trigger::AutomaticEscalationReset(o) | Trigger::PdfCreation(o) => &mut o.condition,
        };
        *slot = condition;
    }

    pub fn with_condition(mut self, condition: Option<Condition>) -> Self {
        self.set_condition(condition);
        self
    }

    /// `channel_template_condition`, identifying a trigger across rebuilds
    pub fn key(&self) -> String {
        let condition = self
            .condition()
            .map(Condition::canonical)
            .unwrap_or_else(|| "no_condition".to_string());
        format!("{}_{}_{}", self.channel(), self.template().unwrap_or("default"), condition)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationLevel {
    /// Milliseconds before escalating to the next level
    pub next_level_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields_change: Vec<FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_assignment: Option<bool>,
    #[serde(default)]
    pub levels: Vec<EscalationLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomaticAssignment {
    pub is_enabled: bool,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtering_query: Option<Value>,
    #[serde(default)]
    pub trigger_flows: Vec<TriggerFlow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic_assignment: Option<AutomaticAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowCreation {
    pub email: String,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSpent {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl Default for TimeSpent {
    fn default() -> Self {
        Self {
            name: "Time Spent".to_string(),
            kind: "number".to_string(),
            hidden: Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub workflow_name: String,
    pub workflow_type: WorkflowType,
    pub report_name_prefix: String,
    pub reporter_name_prefix: String,
    #[serde(default = "text_format")]
    pub description_format: String,
    pub name_template: String,
    pub description_template: String,
    #[serde(rename = "type")]
    pub type_field: EnumField,
    pub status_flow: StatusFlow,
    pub priority: EnumField,
    #[serde(default)]
    pub custom_fields: IndexMap<String, CustomField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_hierarchy: Option<AdminHierarchy>,
    #[serde(default)]
    pub time_spent: TimeSpent,
    #[serde(default)]
    pub assignment: Assignment,
    pub workflow_creation: WorkflowCreation,
    /// Optional sections carried through unchanged (reminders, subTask, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn text_format() -> String {
    "text".to_string()
}
