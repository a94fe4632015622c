//! Workflow draft state
//!
//! [`WorkflowDocument`] owns the editable [`Workflow`] together with the
//! toggle state of the built-in trigger catalogs and the review channel
//! selection. Every command validates first and mutates last, so a rejected
//! command leaves the document exactly as it was.

use anyhow::{Context, Result};
use chrono::Utc;
use indexmap::IndexMap;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::color::Rgb;
use super::condition::{Condition, RESOLVED};
use super::model::{
    AdminHeader, AdminHierarchy, Assignment, AutomaticAssignment, CustomField, EnumField, EnumValue,
    EscalationLevel, FieldType, HeaderKind, Status, StatusFlow, TimeSpent, Transition, Trigger,
    TriggerFlow, Workflow, WorkflowCreation, WorkflowType,
};
use super::triggers::{self, CatalogEntry, CustomTrigger};
use super::type_values;
use crate::error::{EditError, EditResult};

pub const DEFAULT_WORKFLOW_NAME: &str = "Customer Satisfaction Survey";
pub const DEFAULT_BOT_EMAIL: &str = "bot@emojot.com";
pub const DEFAULT_ESCALATION_ASSIGNEE: &str = "admin@emojot.com";
/// 24 hours
pub const DEFAULT_ESCALATION_MS: u64 = 86_400_000;
/// 1 hour
pub const NEW_LEVEL_MS: u64 = 3_600_000;
pub const ADMIN_LIST: &str = "adminList";

/// Free-text basics that are copied verbatim into the export
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TextField {
    ReportNamePrefix,
    ReporterNamePrefix,
    NameTemplate,
    DescriptionTemplate,
}

/// Changes applied by [`WorkflowDocument::edit_status`]; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct StatusEdit {
    pub name: Option<String>,
    pub background: Option<String>,
    pub text_color: Option<String>,
    pub is_initial: Option<bool>,
    pub is_final: Option<bool>,
    pub high_priority_fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldFlags {
    pub required: Option<bool>,
    pub read_only: Option<bool>,
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    workflow: Workflow,
    /// Keys of the creation catalog entries that are switched on
    #[serde(default)]
    enabled_creation_triggers: BTreeSet<String>,
    /// Written after the catalog triggers, in insertion order
    #[serde(default)]
    custom_creation_triggers: Vec<Trigger>,
    /// Assignment catalog entries are on unless listed here
    #[serde(default)]
    disabled_assignment_triggers: BTreeSet<String>,
    #[serde(default)]
    review_channels: Vec<String>,
    /// Set once `type.values` has been edited by hand
    #[serde(default)]
    type_values_customized: bool,
}

/// Catalog triggers that were active before a rename or type change
struct ToggleSnapshot {
    enabled_creation: Vec<Trigger>,
    disabled_assignment: Vec<Trigger>,
    had_creation_triggers: bool,
}

impl Default for WorkflowDocument {
    fn default() -> Self {
        Self::new(WorkflowType::Ccm, DEFAULT_WORKFLOW_NAME)
    }
}

impl WorkflowDocument {
    /// The default skeleton for a workflow type
    pub fn new(workflow_type: WorkflowType, name: &str) -> Self {
        let channels = type_values::default_channels(workflow_type);
        let workflow = skeleton(workflow_type, name, &channels);
        Self::assemble(workflow, channels, false)
    }

    /// Wrap a workflow whose `type.values` were chosen by someone else
    pub fn from_template(workflow: Workflow) -> Self {
        let channels = type_values::catalog_order(
            &workflow
                .type_field
                .values
                .iter()
                .map(|v| v.id.clone())
                .collect::<Vec<_>>(),
        );
        Self::assemble(workflow, channels, true)
    }

    fn assemble(workflow: Workflow, review_channels: Vec<String>, type_values_customized: bool) -> Self {
        let mut doc = Self {
            workflow,
            enabled_creation_triggers: BTreeSet::new(),
            custom_creation_triggers: Vec::new(),
            disabled_assignment_triggers: BTreeSet::new(),
            review_channels,
            type_values_customized,
        };
        doc.enabled_creation_triggers = doc
            .creation_catalog()
            .iter()
            .filter(|e| e.enabled_by_default())
            .map(|e| e.trigger.key())
            .collect();
        doc.sync_creation_triggers();
        doc.sync_assignment_triggers();
        doc
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn name(&self) -> &str {
        &self.workflow.workflow_name
    }

    pub fn workflow_type(&self) -> WorkflowType {
        self.workflow.workflow_type
    }

    pub fn review_channels(&self) -> &[String] {
        &self.review_channels
    }

    pub fn type_values_customized(&self) -> bool {
        self.type_values_customized
    }

    pub fn custom_creation_triggers(&self) -> &[Trigger] {
        &self.custom_creation_triggers
    }

    // ---- basic info -------------------------------------------------------

    /// Rename the workflow; catalogs and derived type values follow the new name
    pub fn rename(&mut self, name: &str) -> EditResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::MissingField("Workflow name"));
        }

        let snapshot = self.snapshot();
        self.workflow.workflow_name = name.to_string();
        if !self.type_values_customized {
            self.refresh_type_values();
        }
        self.restore_toggles(snapshot);
        debug!("Renamed workflow to '{}'", name);
        Ok(())
    }

    pub fn set_text(&mut self, field: TextField, value: &str) {
        let slot = match field {
            TextField::ReportNamePrefix => &mut self.workflow.report_name_prefix,
            TextField::ReporterNamePrefix => &mut self.workflow.reporter_name_prefix,
            TextField::NameTemplate => &mut self.workflow.name_template,
            TextField::DescriptionTemplate => &mut self.workflow.description_template,
        };
        *slot = value.to_string();
    }

    /// Sender address for creation notifications and escalation
    pub fn set_bot_email(&mut self, email: &str) -> EditResult<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(EditError::MissingField("Email"));
        }
        self.workflow.workflow_creation.email = email.to_string();
        Ok(())
    }

    /// Rebuild from the skeleton of another type.
    ///
    /// Name, prefixes, templates, bot email and the review channel selection
    /// survive. Hand-edited type values survive too; otherwise they are
    /// derived again for the new type.
    pub fn set_workflow_type(&mut self, workflow_type: WorkflowType) -> bool {
        if workflow_type == self.workflow.workflow_type {
            return false;
        }

        let old = &self.workflow;
        let channels = if self.review_channels.is_empty() {
            type_values::default_channels(workflow_type)
        } else {
            self.review_channels.clone()
        };

        let mut workflow = skeleton(workflow_type, &old.workflow_name, &channels);
        workflow.report_name_prefix = old.report_name_prefix.clone();
        workflow.reporter_name_prefix = old.reporter_name_prefix.clone();
        workflow.name_template = old.name_template.clone();
        workflow.description_template = old.description_template.clone();
        workflow.workflow_creation.email = old.workflow_creation.email.clone();
        if self.type_values_customized {
            workflow.type_field.values = old.type_field.values.clone();
        }

        *self = Self::assemble(workflow, channels, self.type_values_customized);
        info!("Switched workflow type to {}", workflow_type);
        true
    }

    // ---- type values ------------------------------------------------------

    pub fn set_type_name(&mut self, name: &str) -> EditResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::MissingField("Type name"));
        }
        self.workflow.type_field.name = name.to_string();
        Ok(())
    }

    /// Add a hand-written type value; its id is the lowercased name without spaces
    pub fn add_type_value(&mut self, name: &str) -> EditResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::MissingField("Type value"));
        }
        let id = type_value_id(name);
        if self.workflow.type_field.contains(&id) {
            return Err(EditError::DuplicateValue(id));
        }

        self.workflow.type_field.values.push(EnumValue::new(id.clone(), name));
        self.type_values_customized = true;
        Ok(id)
    }

    pub fn rename_type_value(&mut self, id: &str, name: &str) -> EditResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::MissingField("Type value"));
        }
        let index = self.type_value_index(id)?;
        let new_id = type_value_id(name);
        if new_id != id && self.workflow.type_field.contains(&new_id) {
            return Err(EditError::DuplicateValue(new_id));
        }

        let value = &mut self.workflow.type_field.values[index];
        value.id = new_id.clone();
        value.name = name.to_string();
        self.type_values_customized = true;
        Ok(new_id)
    }

    pub fn remove_type_value(&mut self, id: &str) -> EditResult<EnumValue> {
        let index = self.type_value_index(id)?;
        if self.workflow.type_field.values.len() <= 1 {
            return Err(EditError::LastTypeValue);
        }
        if self.workflow.workflow_type != WorkflowType::Orm
            && id == type_values::camel_case(&self.workflow.workflow_name)
        {
            return Err(EditError::ProtectedTypeValue(id.to_string()));
        }

        self.type_values_customized = true;
        Ok(self.workflow.type_field.values.remove(index))
    }

    /// Drop hand edits and derive `type.values` from type, name and channels again
    pub fn reset_type_values(&mut self) {
        self.type_values_customized = false;
        self.refresh_type_values();
    }

    /// Select a review channel. Returns false if it was already selected.
    pub fn add_channel(&mut self, query: &str) -> EditResult<bool> {
        let id = type_values::lookup_channel(query)?;
        if self.review_channels.iter().any(|c| c == id) {
            return Ok(false);
        }

        let mut channels = self.review_channels.clone();
        channels.push(id.to_string());
        self.review_channels = type_values::catalog_order(&channels);

        if !self.type_values_customized {
            self.refresh_type_values();
        } else if self.workflow.workflow_type.has_reviews() && !self.workflow.type_field.contains(id) {
            self.workflow.type_field.values.push(type_values::channel_value(id));
        }
        Ok(true)
    }

    /// Deselect a review channel. Returns false if it was not selected.
    pub fn remove_channel(&mut self, query: &str) -> EditResult<bool> {
        let id = type_values::lookup_channel(query)?;
        if !self.review_channels.iter().any(|c| c == id) {
            return Ok(false);
        }
        if self.workflow.workflow_type.has_reviews() {
            let remaining = self.workflow.type_field.values.iter().filter(|v| v.id != id).count();
            if remaining == 0 {
                return Err(EditError::LastTypeValue);
            }
        }

        self.review_channels.retain(|c| c != id);
        if !self.type_values_customized {
            self.refresh_type_values();
        } else if self.workflow.workflow_type.has_reviews() {
            self.workflow.type_field.values.retain(|v| v.id != id);
        }
        Ok(true)
    }

    // ---- statuses ---------------------------------------------------------

    /// Append a status whose id is its name. Text colors stay derived.
    pub fn add_status(&mut self, name: &str, background: &str) -> EditResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::MissingField("Status name"));
        }
        if self.workflow.status_flow.status(name).is_some() {
            return Err(EditError::DuplicateStatus(name.to_string()));
        }
        let background = Rgb::parse(background)?.to_hex();

        self.workflow.status_flow.statuses.push(Status::new(name, background));
        debug!("Added status '{}'", name);
        Ok(())
    }

    /// Remove a status and every transition touching it
    pub fn remove_status(&mut self, id: &str) -> EditResult<Status> {
        let flow = &self.workflow.status_flow;
        let index = flow
            .statuses
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| EditError::UnknownStatus(id.to_string()))?;
        let status = &flow.statuses[index];
        if status.is_initial || status.is_final {
            return Err(EditError::ProtectedStatus(id.to_string()));
        }

        let flow = &mut self.workflow.status_flow;
        flow.transitions
            .retain(|t| t.source_state != id && !t.target_states.iter().any(|s| s == id));
        Ok(flow.statuses.remove(index))
    }

    pub fn edit_status(&mut self, id: &str, edit: StatusEdit) -> EditResult<()> {
        let flow = &self.workflow.status_flow;
        let index = flow
            .statuses
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| EditError::UnknownStatus(id.to_string()))?;

        let new_name = match edit.name.as_deref().map(str::trim) {
            Some("") => return Err(EditError::MissingField("Status name")),
            Some(name) if name != id && flow.status(name).is_some() => {
                return Err(EditError::DuplicateStatus(name.to_string()));
            }
            other => other.map(str::to_string),
        };
        let background = edit.background.as_deref().map(Rgb::parse).transpose()?.map(Rgb::to_hex);
        let text_color = edit.text_color.as_deref().map(Rgb::parse).transpose()?.map(Rgb::to_hex);

        if edit.is_initial == Some(true) {
            for status in &mut self.workflow.status_flow.statuses {
                status.is_initial = false;
            }
        }

        let status = &mut self.workflow.status_flow.statuses[index];
        if let Some(background) = background {
            status.background_color = Some(background);
            status.text_color = None;
            status.status_text_color = None;
            status.status_background_color = None;
        }
        if text_color.is_some() {
            status.text_color = text_color;
        }
        if let Some(is_initial) = edit.is_initial {
            status.is_initial = is_initial;
        }
        if let Some(is_final) = edit.is_final {
            status.is_final = is_final;
        }
        if let Some(fields) = edit.high_priority_fields {
            status.high_priority_fields = fields;
        }

        if let Some(new_name) = new_name {
            status.id = new_name.clone();
            status.name = new_name.clone();
            for transition in &mut self.workflow.status_flow.transitions {
                if transition.source_state == id {
                    transition.source_state = new_name.clone();
                }
                for target in &mut transition.target_states {
                    if target == id {
                        *target = new_name.clone();
                    }
                }
            }
        }
        Ok(())
    }

    // ---- transitions ------------------------------------------------------

    pub fn add_transition(&mut self, from: &str, to: &str) -> EditResult<()> {
        let flow = &self.workflow.status_flow;
        for state in [from, to] {
            if flow.status(state).is_none() {
                return Err(EditError::UnknownStatus(state.to_string()));
            }
        }
        if flow.targets_of(from).iter().any(|t| t == to) {
            return Err(EditError::DuplicateTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let transitions = &mut self.workflow.status_flow.transitions;
        match transitions.iter_mut().find(|t| t.source_state == from) {
            Some(existing) => existing.target_states.push(to.to_string()),
            None => transitions.push(Transition {
                source_state: from.to_string(),
                target_states: vec![to.to_string()],
            }),
        }
        Ok(())
    }

    pub fn remove_transition(&mut self, from: &str, to: &str) -> EditResult<()> {
        if !self.workflow.status_flow.targets_of(from).iter().any(|t| t == to) {
            return Err(EditError::UnknownTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let transitions = &mut self.workflow.status_flow.transitions;
        for transition in transitions.iter_mut().filter(|t| t.source_state == from) {
            transition.target_states.retain(|t| t != to);
        }
        transitions.retain(|t| !t.target_states.is_empty());
        Ok(())
    }

    // ---- priority ---------------------------------------------------------

    /// Priority ids equal their names
    pub fn add_priority(&mut self, name: &str) -> EditResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::MissingField("Priority value"));
        }
        if self.workflow.priority.contains(name) {
            return Err(EditError::DuplicateValue(name.to_string()));
        }
        self.workflow.priority.values.push(EnumValue::new(name, name));
        Ok(())
    }

    pub fn remove_priority(&mut self, id: &str) -> EditResult<EnumValue> {
        let values = &mut self.workflow.priority.values;
        let index = values
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| EditError::UnknownValue(id.to_string()))?;
        Ok(values.remove(index))
    }

    // ---- custom fields ----------------------------------------------------

    /// Add a field; without an explicit id one is made from the name
    pub fn add_field(&mut self, name: &str, id: Option<&str>, field_type: FieldType) -> EditResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::MissingField("Field name"));
        }
        let id = match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => field_id(name),
        };
        if self.workflow.custom_fields.contains_key(&id) {
            return Err(EditError::DuplicateField(id));
        }

        self.workflow
            .custom_fields
            .insert(id.clone(), CustomField::new(name, field_type));
        Ok(id)
    }

    pub fn remove_field(&mut self, id: &str) -> EditResult<CustomField> {
        self.workflow
            .custom_fields
            .shift_remove(id)
            .ok_or_else(|| EditError::UnknownField(id.to_string()))
    }

    pub fn set_field_flags(&mut self, id: &str, flags: FieldFlags) -> EditResult<()> {
        let field = self
            .workflow
            .custom_fields
            .get_mut(id)
            .ok_or_else(|| EditError::UnknownField(id.to_string()))?;
        if flags.required.is_some() {
            field.required = flags.required;
        }
        if flags.read_only.is_some() {
            field.read_only = flags.read_only;
        }
        if flags.hidden.is_some() {
            field.hidden = flags.hidden;
        }
        Ok(())
    }

    /// Add an option to an enum or multiselect field; id and name are the same
    pub fn add_option(&mut self, field_id: &str, option: &str) -> EditResult<()> {
        let option = option.trim();
        if option.is_empty() {
            return Err(EditError::MissingField("Option name"));
        }
        let field = self.options_field(field_id)?;
        let values = field.values.get_or_insert_with(Vec::new);
        if values.iter().any(|v| v.id == option) {
            return Err(EditError::DuplicateOption(option.to_string()));
        }
        values.push(EnumValue::new(option, option));
        Ok(())
    }

    pub fn remove_option(&mut self, field_id: &str, option_id: &str) -> EditResult<EnumValue> {
        let field = self.options_field(field_id)?;
        let values = field.values.get_or_insert_with(Vec::new);
        let index = values
            .iter()
            .position(|v| v.id == option_id)
            .ok_or_else(|| EditError::UnknownValue(option_id.to_string()))?;
        Ok(values.remove(index))
    }

    // ---- admin hierarchy --------------------------------------------------

    pub fn add_header(&mut self, kind: HeaderKind, id: &str, name: &str) -> EditResult<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(EditError::MissingField("Header id"));
        }
        let name = match name.trim() {
            "" => id,
            name => name,
        };

        let hierarchy = self.workflow.admin_hierarchy.get_or_insert_with(|| AdminHierarchy {
            list: ADMIN_LIST.to_string(),
            id: Some(admin_hierarchy_id()),
            headers: Vec::new(),
            extra: Map::new(),
        });
        if hierarchy.headers.iter().any(|h| h.id == id && h.kind == kind) {
            return Err(EditError::DuplicateHeader(id.to_string()));
        }
        hierarchy.headers.push(AdminHeader {
            id: id.to_string(),
            name: name.to_string(),
            kind,
        });
        Ok(())
    }

    pub fn remove_header(&mut self, index: usize) -> EditResult<AdminHeader> {
        match self.workflow.admin_hierarchy.as_mut() {
            Some(hierarchy) if index < hierarchy.headers.len() => Ok(hierarchy.headers.remove(index)),
            _ => Err(EditError::HeaderOutOfRange(index)),
        }
    }

    // ---- creation triggers ------------------------------------------------

    pub fn creation_catalog(&self) -> Vec<CatalogEntry> {
        triggers::creation_catalog(self.workflow.workflow_type, &self.workflow.workflow_name)
    }

    pub fn is_creation_trigger_enabled(&self, trigger: &Trigger) -> bool {
        self.enabled_creation_triggers.contains(&trigger.key())
    }

    /// Flip a catalog trigger, found by catalog id or key. Returns the new state.
    pub fn toggle_creation_trigger(&mut self, selector: &str) -> EditResult<bool> {
        let entry = self
            .creation_catalog()
            .into_iter()
            .find(|e| e.id == selector || e.trigger.key() == selector)
            .ok_or_else(|| EditError::UnknownTrigger(selector.to_string()))?;

        let key = entry.trigger.key();
        let enabled = if self.enabled_creation_triggers.remove(&key) {
            false
        } else {
            self.enabled_creation_triggers.insert(key);
            true
        };
        self.sync_creation_triggers();
        debug!("Creation trigger {} is now {}", entry.id, if enabled { "on" } else { "off" });
        Ok(enabled)
    }

    pub fn add_custom_trigger(&mut self, custom: CustomTrigger) -> EditResult<()> {
        let trigger = custom.build()?;
        self.custom_creation_triggers.push(trigger);
        self.sync_creation_triggers();
        Ok(())
    }

    pub fn remove_custom_trigger(&mut self, index: usize) -> EditResult<Trigger> {
        if index >= self.custom_creation_triggers.len() {
            return Err(EditError::UnknownTrigger(format!("#{}", index)));
        }
        let removed = self.custom_creation_triggers.remove(index);
        self.sync_creation_triggers();
        Ok(removed)
    }

    // ---- assignment -------------------------------------------------------

    pub fn assignment_catalog(&self) -> Vec<Trigger> {
        triggers::assignment_catalog(self.workflow.workflow_type, &self.workflow.workflow_name)
    }

    pub fn is_assignment_trigger_enabled(&self, trigger: &Trigger) -> bool {
        !self.disabled_assignment_triggers.contains(&trigger.key())
    }

    /// Flip an assignment trigger, found by template name or key. Returns the new state.
    pub fn toggle_assignment_trigger(&mut self, selector: &str) -> EditResult<bool> {
        let trigger = self
            .assignment_catalog()
            .into_iter()
            .find(|t| t.template() == Some(selector) || t.key() == selector)
            .ok_or_else(|| EditError::UnknownTrigger(selector.to_string()))?;

        let key = trigger.key();
        let enabled = if self.disabled_assignment_triggers.remove(&key) {
            true
        } else {
            self.disabled_assignment_triggers.insert(key);
            false
        };
        self.sync_assignment_triggers();
        Ok(enabled)
    }

    /// Switch automatic escalation on with one day-long level, or off entirely
    pub fn set_automatic_assignment(&mut self, enabled: bool) {
        let assignment = &mut self.workflow.assignment;
        if !enabled {
            assignment.automatic_assignment = None;
            return;
        }
        if assignment.automatic_assignment.is_some() {
            return;
        }
        assignment.automatic_assignment = Some(AutomaticAssignment {
            is_enabled: true,
            email: self.workflow.workflow_creation.email.clone(),
            filtering_query: None,
            trigger_flows: vec![TriggerFlow {
                condition: Some(Condition::not_equals("status", RESOLVED)),
                skip_assignment: None,
                levels: vec![EscalationLevel {
                    next_level_time: DEFAULT_ESCALATION_MS,
                    assignee: Some(DEFAULT_ESCALATION_ASSIGNEE.to_string()),
                    fields_change: Vec::new(),
                }],
            }],
        });
    }

    pub fn set_assignment_email(&mut self, email: &str) -> EditResult<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(EditError::MissingField("Email"));
        }
        self.automatic_assignment_mut()?.email = email.to_string();
        Ok(())
    }

    /// Append a one-hour level with no assignee. Returns its index.
    pub fn add_escalation_level(&mut self) -> EditResult<usize> {
        let flow = self.first_flow_mut()?;
        flow.levels.push(EscalationLevel {
            next_level_time: NEW_LEVEL_MS,
            assignee: Some(String::new()),
            fields_change: Vec::new(),
        });
        Ok(flow.levels.len() - 1)
    }

    pub fn remove_escalation_level(&mut self, index: usize) -> EditResult<EscalationLevel> {
        let flow = self.first_flow_mut()?;
        if index >= flow.levels.len() {
            return Err(EditError::LevelOutOfRange(index));
        }
        Ok(flow.levels.remove(index))
    }

    pub fn edit_escalation_level(
        &mut self,
        index: usize,
        next_level_time: Option<u64>,
        assignee: Option<&str>,
    ) -> EditResult<()> {
        let flow = self.first_flow_mut()?;
        let level = flow.levels.get_mut(index).ok_or(EditError::LevelOutOfRange(index))?;
        if let Some(ms) = next_level_time {
            level.next_level_time = ms;
        }
        if let Some(assignee) = assignee {
            level.assignee = Some(assignee.trim().to_string());
        }
        Ok(())
    }

    // ---- consistency ------------------------------------------------------

    /// Problems the platform would trip over; none of them block editing
    pub fn warnings(&self) -> Vec<String> {
        let flow = &self.workflow.status_flow;
        let mut warnings = Vec::new();

        match flow.statuses.iter().filter(|s| s.is_initial).count() {
            1 => {}
            0 => warnings.push("No status is marked initial".to_string()),
            n => warnings.push(format!("{} statuses are marked initial", n)),
        }
        if flow.status(RESOLVED).is_none()
            && self.workflow.workflow_creation.triggers.iter().any(triggers::is_resolution)
        {
            warnings.push(format!(
                "Resolution triggers are dropped on export: there is no '{}' status to attach them to",
                RESOLVED
            ));
        }
        for transition in &flow.transitions {
            for state in std::iter::once(&transition.source_state).chain(&transition.target_states) {
                if flow.status(state).is_none() {
                    warnings.push(format!("Transition references unknown status '{}'", state));
                }
            }
        }
        if self.workflow.type_field.values.is_empty() {
            warnings.push("Type has no values".to_string());
        }
        warnings
    }

    // ---- persistence ------------------------------------------------------

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse workflow draft")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize workflow draft")
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read workflow draft: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid workflow draft: {}", path.display()))
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write workflow draft: {}", path.display()))?;
        debug!("Saved workflow draft to {}", path.display());
        Ok(())
    }

    // ---- internals --------------------------------------------------------

    fn refresh_type_values(&mut self) {
        self.workflow.type_field.values = type_values::derive(
            self.workflow.workflow_type,
            &self.workflow.workflow_name,
            &self.review_channels,
        );
    }

    fn type_value_index(&self, id: &str) -> EditResult<usize> {
        self.workflow
            .type_field
            .values
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| EditError::UnknownValue(id.to_string()))
    }

    fn options_field(&mut self, field_id: &str) -> EditResult<&mut CustomField> {
        let field = self
            .workflow
            .custom_fields
            .get_mut(field_id)
            .ok_or_else(|| EditError::UnknownField(field_id.to_string()))?;
        if !field.field_type.has_options() {
            return Err(EditError::FieldHasNoOptions(field_id.to_string()));
        }
        Ok(field)
    }

    fn automatic_assignment_mut(&mut self) -> EditResult<&mut AutomaticAssignment> {
        self.workflow
            .assignment
            .automatic_assignment
            .as_mut()
            .ok_or(EditError::AutomaticAssignmentDisabled)
    }

    fn first_flow_mut(&mut self) -> EditResult<&mut TriggerFlow> {
        let auto = self.automatic_assignment_mut()?;
        if auto.trigger_flows.is_empty() {
            auto.trigger_flows.push(TriggerFlow {
                condition: Some(Condition::not_equals("status", RESOLVED)),
                skip_assignment: None,
                levels: Vec::new(),
            });
        }
        Ok(&mut auto.trigger_flows[0])
    }

    fn sync_creation_triggers(&mut self) {
        let mut list: Vec<Trigger> = self
            .creation_catalog()
            .into_iter()
            .filter(|e| self.enabled_creation_triggers.contains(&e.trigger.key()))
            .map(|e| e.trigger)
            .collect();
        list.extend(self.custom_creation_triggers.iter().cloned());
        self.workflow.workflow_creation.triggers = list;
    }

    fn sync_assignment_triggers(&mut self) {
        let list: Vec<Trigger> = self
            .assignment_catalog()
            .into_iter()
            .filter(|t| self.is_assignment_trigger_enabled(t))
            .collect();
        self.workflow.assignment.triggers = list;
    }

    fn snapshot(&self) -> ToggleSnapshot {
        ToggleSnapshot {
            enabled_creation: self
                .creation_catalog()
                .into_iter()
                .filter(|e| self.enabled_creation_triggers.contains(&e.trigger.key()))
                .map(|e| e.trigger)
                .collect(),
            disabled_assignment: self
                .assignment_catalog()
                .into_iter()
                .filter(|t| !self.is_assignment_trigger_enabled(t))
                .collect(),
            had_creation_triggers: !self.workflow.workflow_creation.triggers.is_empty(),
        }
    }

    /// Re-key toggles after the catalogs changed, matching on channel,
    /// template and target. A document with no creation triggers at all
    /// falls back to the defaults.
    fn restore_toggles(&mut self, snapshot: ToggleSnapshot) {
        let catalog = self.creation_catalog();
        self.enabled_creation_triggers = if snapshot.had_creation_triggers {
            catalog
                .iter()
                .filter(|e| snapshot.enabled_creation.iter().any(|t| e.matches(t)))
                .map(|e| e.trigger.key())
                .collect()
        } else {
            catalog
                .iter()
                .filter(|e| e.enabled_by_default())
                .map(|e| e.trigger.key())
                .collect()
        };

        self.disabled_assignment_triggers = self
            .assignment_catalog()
            .into_iter()
            .filter(|t| {
                snapshot.disabled_assignment.iter().any(|d| {
                    d.channel() == t.channel() && d.template() == t.template() && d.target() == t.target()
                })
            })
            .map(|t| t.key())
            .collect();

        self.sync_creation_triggers();
        self.sync_assignment_triggers();
    }
}

/// "Room Number" -> "room_number"
pub fn field_id(name: &str) -> String {
    name.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

/// "Staff Feedback" -> "stafffeedback"
pub fn type_value_id(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect()
}

/// `AHI_<epoch millis>_<random>`
pub fn admin_hierarchy_id() -> String {
    let random: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("AHI_{}_{}", Utc::now().timestamp_millis(), random)
}

fn base_custom_fields(workflow_type: WorkflowType) -> IndexMap<String, CustomField> {
    let mut fields = IndexMap::new();
    fields.insert(
        "location".to_string(),
        CustomField::new("Location", FieldType::Enum)
            .required(true)
            .with_values(vec![
                EnumValue::new("main_branch", "Main Branch"),
                EnumValue::new("downtown", "Downtown"),
                EnumValue::new("uptown", "Uptown"),
            ]),
    );
    fields.insert(
        "customer_name".to_string(),
        CustomField::new("Customer Name", FieldType::String).required(true),
    );
    fields.insert(
        "rating".to_string(),
        CustomField::new("Rating", FieldType::String).required(true).read_only(true),
    );
    fields.insert(
        "comment".to_string(),
        CustomField::new("Comment", FieldType::TextArea).read_only(true),
    );

    if workflow_type.has_reviews() {
        fields.insert(
            "review_platform".to_string(),
            CustomField::new("Review Platform", FieldType::Enum)
                .required(true)
                .read_only(true)
                .with_values(vec![
                    EnumValue::new("google", "Google"),
                    EnumValue::new("facebook", "Facebook"),
                    EnumValue::new("tripadvisor", "TripAdvisor"),
                ]),
        );
        fields.insert(
            "review_url".to_string(),
            CustomField::new("Review URL", FieldType::String).read_only(true),
        );
    }
    fields
}

fn default_admin_hierarchy() -> AdminHierarchy {
    let header = |id: &str, name: &str, kind| AdminHeader {
        id: id.to_string(),
        name: name.to_string(),
        kind,
    };
    AdminHierarchy {
        list: ADMIN_LIST.to_string(),
        id: Some(admin_hierarchy_id()),
        headers: vec![
            header("location", "Location", HeaderKind::CustomField),
            header("ticketAssignee", "Ticket Assignee", HeaderKind::Contact),
            header("ticketCreationAlert", "Ticket Creation Alert", HeaderKind::Contact),
            header("ticketResolutionAlert", "Ticket Resolution Alert", HeaderKind::Contact),
        ],
        extra: Map::new(),
    }
}

/// The built-in starting point: Open -> In Progress -> Resolved
pub(crate) fn skeleton(workflow_type: WorkflowType, name: &str, channels: &[String]) -> Workflow {
    let mut open = Status::new("Open", "#f4b000");
    open.is_initial = true;
    let in_progress = Status::new("In Progress", "#0088cc");
    let mut resolved = Status::new(RESOLVED, "#00aa55");
    resolved.is_final = true;

    Workflow {
        workflow_name: name.to_string(),
        workflow_type,
        report_name_prefix: "Case".to_string(),
        reporter_name_prefix: "Customer".to_string(),
        description_format: "text".to_string(),
        name_template: "Customer Complaint: $type$".to_string(),
        description_template: "Customer Complaint from $type$".to_string(),
        type_field: EnumField::new("Type", type_values::derive(workflow_type, name, channels)),
        status_flow: StatusFlow {
            statuses: vec![open, in_progress, resolved],
            transitions: vec![
                Transition {
                    source_state: "Open".to_string(),
                    target_states: vec!["In Progress".to_string()],
                },
                Transition {
                    source_state: "In Progress".to_string(),
                    target_states: vec![RESOLVED.to_string()],
                },
            ],
            conditional_transitions: Vec::new(),
        },
        priority: EnumField::new(
            "Priority",
            vec![
                EnumValue::new("Low", "Low"),
                EnumValue::new("Medium", "Medium"),
                EnumValue::new("High", "High"),
            ],
        ),
        custom_fields: base_custom_fields(workflow_type),
        admin_hierarchy: Some(default_admin_hierarchy()),
        time_spent: TimeSpent::default(),
        assignment: Assignment::default(),
        workflow_creation: WorkflowCreation {
            email: DEFAULT_BOT_EMAIL.to_string(),
            triggers: Vec::new(),
        },
        extra: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::model::Target;
    use crate::workflow::triggers::NotificationChannel;

    fn doc() -> WorkflowDocument {
        WorkflowDocument::new(WorkflowType::Ccm, DEFAULT_WORKFLOW_NAME)
    }

    fn templates(triggers: &[Trigger]) -> Vec<&str> {
        triggers.iter().filter_map(Trigger::template).collect()
    }

    #[test]
    fn test_skeleton() {
        let doc = doc();
        let wf = doc.workflow();

        assert_eq!(wf.type_field.values, vec![EnumValue::new("customerSatisfactionSurvey", DEFAULT_WORKFLOW_NAME)]);
        assert_eq!(wf.status_flow.statuses.len(), 3);
        assert!(wf.status_flow.statuses[0].is_initial);
        assert!(wf.status_flow.statuses[2].is_final);
        assert_eq!(wf.custom_fields.keys().collect::<Vec<_>>(), vec!["location", "customer_name", "rating", "comment"]);
        assert!(wf.admin_hierarchy.as_ref().unwrap().id.as_ref().unwrap().starts_with("AHI_"));
        assert_eq!(
            templates(&wf.workflow_creation.triggers),
            vec!["complaintCreationAlert_email", "complaintResolutionAlert_email"]
        );
        assert_eq!(wf.assignment.triggers.len(), 2);
        assert!(doc.warnings().is_empty());
    }

    #[test]
    fn test_orm_skeleton_has_review_fields() {
        let doc = WorkflowDocument::new(WorkflowType::Orm, "Reviews");
        let wf = doc.workflow();
        assert!(wf.custom_fields.contains_key("review_platform"));
        assert_eq!(wf.type_field.values, vec![EnumValue::new("googleMap", "Google")]);
        assert_eq!(doc.review_channels(), &["googleMap".to_string()]);
    }

    #[test]
    fn test_add_status_rejects_blank_and_duplicate() {
        let mut doc = doc();
        let before = doc.clone();

        assert_eq!(doc.add_status("  ", "#123456"), Err(EditError::MissingField("Status name")));
        assert_eq!(doc.add_status("Open", "#123456"), Err(EditError::DuplicateStatus("Open".into())));
        assert_eq!(doc.add_status("Escalated", "red"), Err(EditError::InvalidColor("red".into())));
        assert_eq!(doc, before);

        doc.add_status("Escalated", "#FF0000").unwrap();
        let added = doc.workflow().status_flow.status("Escalated").unwrap();
        assert_eq!(added.background_color.as_deref(), Some("#ff0000"));
        assert_eq!(added.text_color, None);
    }

    #[test]
    fn test_remove_status_protects_ends_and_drops_transitions() {
        let mut doc = doc();
        assert_eq!(doc.remove_status("Open"), Err(EditError::ProtectedStatus("Open".into())));
        assert_eq!(doc.remove_status("Resolved"), Err(EditError::ProtectedStatus("Resolved".into())));

        doc.remove_status("In Progress").unwrap();
        assert!(doc.workflow().status_flow.transitions.is_empty());
    }

    #[test]
    fn test_edit_status_renames_through_transitions() {
        let mut doc = doc();
        doc.edit_status(
            "In Progress",
            StatusEdit {
                name: Some("Working".into()),
                background: Some("#8855dd".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let flow = &doc.workflow().status_flow;
        assert_eq!(flow.targets_of("Open"), &["Working".to_string()]);
        assert_eq!(flow.targets_of("Working"), &["Resolved".to_string()]);
        assert_eq!(flow.statuses[1].background_color.as_deref(), Some("#8855dd"));
    }

    #[test]
    fn test_edit_status_moves_initial_flag() {
        let mut doc = doc();
        doc.edit_status(
            "In Progress",
            StatusEdit {
                is_initial: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        let initial: Vec<&str> = doc
            .workflow()
            .status_flow
            .statuses
            .iter()
            .filter(|s| s.is_initial)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(initial, vec!["In Progress"]);
    }

    #[test]
    fn test_transitions() {
        let mut doc = doc();
        doc.add_transition("Open", "Resolved").unwrap();
        assert_eq!(
            doc.workflow().status_flow.targets_of("Open"),
            &["In Progress".to_string(), "Resolved".to_string()]
        );
        assert_eq!(doc.workflow().status_flow.transitions.len(), 2);

        assert!(matches!(
            doc.add_transition("Open", "Resolved"),
            Err(EditError::DuplicateTransition { .. })
        ));
        assert_eq!(doc.add_transition("Open", "Nowhere"), Err(EditError::UnknownStatus("Nowhere".into())));

        doc.remove_transition("In Progress", "Resolved").unwrap();
        assert_eq!(doc.workflow().status_flow.transitions.len(), 1);
        assert!(matches!(
            doc.remove_transition("In Progress", "Resolved"),
            Err(EditError::UnknownTransition { .. })
        ));
    }

    #[test]
    fn test_fields_and_options() {
        let mut doc = doc();
        assert_eq!(doc.add_field("Room Number", None, FieldType::String).unwrap(), "room_number");
        assert_eq!(
            doc.add_field("Room  number", None, FieldType::String),
            Err(EditError::DuplicateField("room_number".into()))
        );

        let id = doc.add_field("Tags", Some("tags"), FieldType::Multiselect).unwrap();
        doc.add_option(&id, "vip").unwrap();
        assert_eq!(doc.add_option(&id, "vip"), Err(EditError::DuplicateOption("vip".into())));
        assert_eq!(
            doc.add_option("room_number", "x"),
            Err(EditError::FieldHasNoOptions("room_number".into()))
        );
        doc.remove_option(&id, "vip").unwrap();
        assert!(doc.workflow().custom_fields["tags"].values.as_ref().unwrap().is_empty());

        doc.remove_field("room_number").unwrap();
        assert_eq!(doc.remove_field("room_number"), Err(EditError::UnknownField("room_number".into())));
    }

    #[test]
    fn test_priority() {
        let mut doc = doc();
        doc.add_priority("Urgent").unwrap();
        assert_eq!(doc.add_priority("Urgent"), Err(EditError::DuplicateValue("Urgent".into())));
        doc.remove_priority("Low").unwrap();
        let ids: Vec<&str> = doc.workflow().priority.values.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["Medium", "High", "Urgent"]);
    }

    #[test]
    fn test_headers() {
        let mut doc = doc();
        assert_eq!(
            doc.add_header(HeaderKind::Contact, "ticketAssignee", "Ticket Assignee"),
            Err(EditError::DuplicateHeader("ticketAssignee".into()))
        );
        doc.add_header(HeaderKind::CustomField, "ticketAssignee", "").unwrap();
        assert_eq!(doc.workflow().admin_hierarchy.as_ref().unwrap().headers.len(), 5);

        doc.remove_header(0).unwrap();
        assert_eq!(doc.remove_header(10), Err(EditError::HeaderOutOfRange(10)));
    }

    #[test]
    fn test_type_values_follow_rename_until_customized() {
        let mut doc = doc();
        doc.rename("Barista Feedback").unwrap();
        assert_eq!(doc.workflow().type_field.values[0].id, "baristaFeedback");

        doc.add_type_value("Staff Feedback").unwrap();
        assert!(doc.type_values_customized());
        doc.rename("Cafe").unwrap();
        let ids: Vec<&str> = doc.workflow().type_field.values.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["baristaFeedback", "stafffeedback"]);

        doc.reset_type_values();
        assert_eq!(doc.workflow().type_field.values, vec![EnumValue::new("cafe", "Cafe")]);
    }

    #[test]
    fn test_type_value_guards() {
        let mut doc = doc();
        assert_eq!(doc.remove_type_value("customerSatisfactionSurvey"), Err(EditError::LastTypeValue));
        doc.add_type_value("Other").unwrap();
        assert_eq!(
            doc.remove_type_value("customerSatisfactionSurvey"),
            Err(EditError::ProtectedTypeValue("customerSatisfactionSurvey".into()))
        );
        doc.remove_type_value("other").unwrap();
    }

    #[test]
    fn test_channels_drive_type_values() {
        let mut doc = WorkflowDocument::new(WorkflowType::Combined, "Grand Hotel");
        assert!(doc.add_channel("Tripadvisor").unwrap());
        assert!(!doc.add_channel("tripadvisor").unwrap());
        assert!(doc.add_channel("booking").unwrap());

        let ids: Vec<&str> = doc.workflow().type_field.values.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["grandHotel", "googleMap", "booking", "tripadvisor"]);
        assert!(!doc.type_values_customized());

        doc.remove_channel("googleMap").unwrap();
        assert_eq!(doc.workflow().type_field.values.len(), 3);
    }

    #[test]
    fn test_orm_keeps_one_channel() {
        let mut doc = WorkflowDocument::new(WorkflowType::Orm, "Reviews");
        assert_eq!(doc.remove_channel("googleMap"), Err(EditError::LastTypeValue));
    }

    #[test]
    fn test_type_change_rebuilds_but_keeps_basics() {
        let mut doc = doc();
        doc.set_text(TextField::ReportNamePrefix, "Ticket");
        doc.add_status("Escalated", "#ff0000").unwrap();
        doc.set_bot_email("noreply@x.com").unwrap();

        assert!(doc.set_workflow_type(WorkflowType::Combined));
        let wf = doc.workflow();
        assert_eq!(wf.report_name_prefix, "Ticket");
        assert_eq!(wf.workflow_creation.email, "noreply@x.com");
        assert!(wf.status_flow.status("Escalated").is_none());
        assert_eq!(wf.type_field.values.len(), 2);
        assert_eq!(wf.assignment.triggers.len(), 4);
        assert_eq!(
            templates(&wf.workflow_creation.triggers),
            vec![
                "complaintCreationAlert_email",
                "complaintResolutionAlert_email",
                "complaintCreationAlert_orm_email",
                "complaintResolutionAlert_orm_email",
            ]
        );
        assert!(!doc.set_workflow_type(WorkflowType::Combined));
    }

    #[test]
    fn test_creation_toggles() {
        let mut doc = doc();
        assert!(doc.toggle_creation_trigger("creation_sms").unwrap());
        assert!(!doc.toggle_creation_trigger("resolution_email").unwrap());
        assert_eq!(
            templates(&doc.workflow().workflow_creation.triggers),
            vec!["complaintCreationAlert_email", "complaintCreationAlert_sms"]
        );
        assert_eq!(
            doc.toggle_creation_trigger("nope"),
            Err(EditError::UnknownTrigger("nope".into()))
        );
    }

    #[test]
    fn test_toggles_survive_rename_in_combined() {
        let mut doc = WorkflowDocument::new(WorkflowType::Combined, "Grand Hotel");
        doc.toggle_creation_trigger("creation_email_orm").unwrap();
        doc.toggle_assignment_trigger("complaintAssignment_orm_sms").unwrap();

        doc.rename("Grand Resort").unwrap();
        let creation = &doc.workflow().workflow_creation.triggers;
        assert_eq!(creation.len(), 3);
        assert!(creation.iter().all(|t| t.template() != Some("complaintCreationAlert_orm_email")));
        assert_eq!(
            creation[0].condition(),
            Some(&Condition::equals("type", "grandResort"))
        );
        assert_eq!(doc.workflow().assignment.triggers.len(), 3);
    }

    #[test]
    fn test_custom_triggers_follow_catalog() {
        let mut doc = doc();
        doc.add_custom_trigger(CustomTrigger {
            channel: NotificationChannel::Email,
            template: "vipAlert".into(),
            target: Target::Admin,
            contacts: Vec::new(),
            filter_by_location: false,
            condition: None,
        })
        .unwrap();
        doc.toggle_creation_trigger("creation_sms").unwrap();

        let triggers = &doc.workflow().workflow_creation.triggers;
        assert_eq!(triggers.last().and_then(Trigger::template), Some("vipAlert"));
        assert_eq!(doc.custom_creation_triggers().len(), 1);

        doc.remove_custom_trigger(0).unwrap();
        assert!(doc.remove_custom_trigger(0).is_err());
        assert_eq!(doc.workflow().workflow_creation.triggers.len(), 3);
    }

    #[test]
    fn test_automatic_assignment() {
        let mut doc = doc();
        assert_eq!(doc.add_escalation_level(), Err(EditError::AutomaticAssignmentDisabled));

        doc.set_automatic_assignment(true);
        let auto = doc.workflow().assignment.automatic_assignment.clone().unwrap();
        assert_eq!(auto.email, DEFAULT_BOT_EMAIL);
        assert_eq!(auto.trigger_flows[0].levels[0].next_level_time, DEFAULT_ESCALATION_MS);
        assert_eq!(
            auto.trigger_flows[0].condition,
            Some(Condition::not_equals("status", RESOLVED))
        );

        assert_eq!(doc.add_escalation_level().unwrap(), 1);
        doc.edit_escalation_level(1, Some(7_200_000), Some("lead@x.com")).unwrap();
        let level = &doc.workflow().assignment.automatic_assignment.as_ref().unwrap().trigger_flows[0].levels[1];
        assert_eq!(level.next_level_time, 7_200_000);
        assert_eq!(level.assignee.as_deref(), Some("lead@x.com"));

        assert_eq!(doc.remove_escalation_level(5), Err(EditError::LevelOutOfRange(5)));
        doc.remove_escalation_level(0).unwrap();

        doc.set_automatic_assignment(false);
        assert!(doc.workflow().assignment.automatic_assignment.is_none());
    }

    #[test]
    fn test_draft_round_trip() {
        let mut doc = WorkflowDocument::new(WorkflowType::Combined, "Grand Hotel");
        doc.toggle_creation_trigger("creation_sms_ccm").unwrap();
        doc.add_channel("yelp").unwrap();

        let text = doc.to_json().unwrap();
        assert_eq!(WorkflowDocument::from_json(&text).unwrap(), doc);
    }

    #[test]
    fn test_ids() {
        assert_eq!(field_id(" Steps to  Reproduce "), "steps_to_reproduce");
        assert_eq!(type_value_id("Staff Feedback"), "stafffeedback");
    }
}
