//! Reads a previously exported `<cepRules>` document back into a rule set

use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use roxmltree::{Document, Node};

use crate::rules::{
    ActionKind, CustomFieldValue, EmailAction, IncidentAction, Rule, RuleAction, RuleParams, RuleSet,
    SmsAction,
};

/// Parse `<cepRules>` XML. Rules are checked with the same validation as
/// `RuleSet::add_rule`, so a hand-edited file cannot smuggle in bad rules.
pub fn from_xml(xml: &str, enforce_unique_ids: bool) -> Result<RuleSet> {
    let doc = Document::parse(xml).context("Failed to parse engagement rules XML")?;
    let root = doc.root_element();
    if !root.has_tag_name("cepRules") {
        bail!("Expected <cepRules> root element, found <{}>", root.tag_name().name());
    }

    let mut set = RuleSet::new().with_unique_ids(enforce_unique_ids);
    for node in root.children().filter(|n| n.has_tag_name("cepRule")) {
        let rule = parse_rule(node)?;
        set.add_rule(&rule)
            .with_context(|| format!("Invalid rule {} in XML", rule.id))?;
    }

    debug!("Parsed {} rules from XML", set.len());
    Ok(set)
}

fn parse_rule(node: Node) -> Result<Rule> {
    let id: i64 = node
        .attribute("id")
        .ok_or_else(|| anyhow!("<cepRule> without id attribute"))?
        .parse()
        .context("Rule id must be an integer")?;
    let time_window: u32 = node
        .attribute("timeWindow")
        .unwrap_or("5")
        .parse()
        .with_context(|| format!("Rule {} has a non-numeric timeWindow", id))?;

    let params_node = child(node, "params").ok_or_else(|| anyhow!("Rule {} has no <params>", id))?;
    let params = parse_params(params_node);

    let action_node = child(node, "engagementActions")
        .and_then(|n| child(n, "action"))
        .ok_or_else(|| anyhow!("Rule {} has no <action>", id))?;

    let kind_name = child_text(action_node, "type");
    let kind = ActionKind::from_name(&kind_name)
        .ok_or_else(|| anyhow!("Rule {} has unknown action type '{}'", id, kind_name))?;

    let data = child(action_node, "data");
    let field = |tag: &str| data.map(|d| child_text(d, tag)).unwrap_or_default();
    let block = |tag: &str| data.and_then(|d| child(d, tag)).map(cdata_text).unwrap_or_default();

    let action = match kind {
        ActionKind::Email => RuleAction::Email(EmailAction {
            to: field("to"),
            subject: field("subject"),
            body: block("body"),
        }),
        ActionKind::Sms => RuleAction::Sms(SmsAction {
            sms_to: field("smsTo"),
            sms_body: field("smsbody"),
        }),
        ActionKind::Incident => RuleAction::Incident(IncidentAction {
            workflow_id: field("workflowID"),
            name: field("name"),
            assignee: field("assignee"),
            incident_type: field("type"),
            priority: field("priority"),
            status: field("status"),
            description: block("description"),
            custom_fields: data
                .and_then(|d| child(d, "customFields"))
                .map(parse_custom_fields)
                .unwrap_or_default(),
        }),
    };

    let validity_period = child(action_node, "validityPeriod").map(|n| n.text().unwrap_or("").trim().to_string());

    Ok(Rule {
        id,
        time_window,
        params,
        action,
        validity_period,
    })
}

fn parse_params(node: Node) -> RuleParams {
    let question = child(node, "param")
        .map(|p| child_text(p, "value"))
        .unwrap_or_default();
    let question_id = question.trim_matches('"').to_string();

    match child(node, "joinParam") {
        Some(join) => RuleParams {
            question_id,
            use_join_param: true,
            operator: child_text(join, "operator"),
            value: child_text(join, "value"),
        },
        None => RuleParams {
            question_id,
            use_join_param: false,
            ..RuleParams::default()
        },
    }
}

fn parse_custom_fields(node: Node) -> Vec<CustomFieldValue> {
    node.children()
        .filter(|n| n.has_tag_name("field"))
        .map(|f| CustomFieldValue {
            key: child_text(f, "key"),
            value: child_text(f, "value"),
        })
        .collect()
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn child_text(node: Node, tag: &str) -> String {
    child(node, tag)
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Concatenated text of a CDATA block without the framing newlines the
/// generator adds around it
fn cdata_text(node: Node) -> String {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();

    let text = text.strip_prefix('\n').unwrap_or(text.as_str());
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.to_string()
}
