/// Engagement rule XML tests
use cxgen::error::EditError;
use cxgen::rules::templates::{self, EMAIL_TEMPLATES};
use cxgen::rules::{
    ActionKind, CustomFieldValue, EmailAction, IncidentAction, RuleAction, RuleBuilder, RuleSet, SmsAction,
    XmlOptions, from_xml,
};

fn alert_builder() -> RuleBuilder {
    let mut builder = RuleBuilder::new(RuleSet::new());
    builder.draft.params.question_id = "q2091".to_string();
    builder.draft.params.use_join_param = true;
    builder.draft.params.operator = "gd".to_string();
    builder.draft.params.value = "0".to_string();
    builder.draft.action = RuleAction::Email(EmailAction {
        to: "a@b.com".to_string(),
        subject: "Alert".to_string(),
        body: String::new(),
    });
    builder
}

#[test]
fn test_email_rule_xml() {
    let mut builder = alert_builder();
    builder.add_rule().unwrap();

    let xml = builder.set.export(&XmlOptions::default()).unwrap();
    println!("Generated XML:\n{}", xml);

    assert!(xml.contains("<value>\"q2091\"</value>"));
    assert!(xml.contains("<joinOperator>and</joinOperator>"));
    assert!(xml.contains("<operator>gd</operator>"));
    assert!(xml.contains("<value>0</value>"));
    assert!(xml.contains("<to>a@b.com</to>"));
    assert!(xml.contains("<cepRule id=\"1\" timeWindow=\"5\">"));
}

#[test]
fn test_builder_resets_draft_after_add() {
    let mut builder = alert_builder();
    builder.add_rule().unwrap();

    assert_eq!(builder.draft.id, 2);
    assert!(builder.draft.params.question_id.is_empty());
    assert_eq!(builder.draft.action.kind(), ActionKind::Email);
}

#[test]
fn test_invalid_drafts_leave_set_unchanged() {
    let mut builder = alert_builder();
    builder.draft.params.question_id.clear();
    assert_eq!(builder.add_rule(), Err(EditError::MissingField("Question ID")));

    builder.draft.params.question_id = "q1".to_string();
    builder.set_action_kind(ActionKind::Sms);
    assert!(builder.add_rule().is_err());

    builder.set_action_kind(ActionKind::Incident);
    assert!(builder.add_rule().is_err());

    assert!(builder.set.is_empty());
    assert_eq!(builder.set.export(&XmlOptions::default()), Err(EditError::NoRules));
}

#[test]
fn test_mixed_rules_survive_reimport() {
    let mut set = RuleSet::new();

    let mut email = alert_builder().draft;
    assert!(templates::apply(&mut email, EMAIL_TEMPLATES[0].name));
    set.add_rule(&email).unwrap();

    let mut sms = email.clone();
    sms.id = 2;
    sms.params.use_join_param = false;
    sms.action = RuleAction::Sms(SmsAction {
        sms_to: "+94770000000".to_string(),
        sms_body: "Low rating at $$location$$".to_string(),
    });
    set.add_rule(&sms).unwrap();

    let mut incident = email.clone();
    incident.id = 3;
    incident.action = RuleAction::Incident(IncidentAction {
        workflow_id: "wf-1".to_string(),
        name: "Low rating".to_string(),
        description: "Rating < 3 & falling".to_string(),
        custom_fields: vec![CustomFieldValue {
            key: "location".to_string(),
            value: "Main".to_string(),
        }],
        ..Default::default()
    });
    set.add_rule(&incident).unwrap();

    let xml = set.export(&XmlOptions::default()).unwrap();
    assert!(xml.contains("<![CDATA["));

    let imported = from_xml(&xml, true).unwrap();
    assert_eq!(imported.rules(), set.rules());
}

#[test]
fn test_duplicate_ids() {
    let draft = alert_builder().draft;

    let mut strict = RuleSet::new();
    strict.add_rule(&draft).unwrap();
    assert_eq!(strict.add_rule(&draft), Err(EditError::DuplicateRuleId(1)));

    let mut loose = RuleSet::new().permissive();
    loose.add_rule(&draft).unwrap();
    loose.add_rule(&draft).unwrap();
    assert_eq!(loose.len(), 2);

    let xml = loose.serialize_all(&XmlOptions::default());
    assert!(from_xml(&xml, true).is_err());
    assert_eq!(from_xml(&xml, false).unwrap().len(), 2);
}

#[test]
fn test_only_escaped_xml_reloads() {
    let mut builder = alert_builder();
    if let RuleAction::Email(email) = &mut builder.draft.action {
        email.subject = "Fish & Chips".to_string();
    }
    builder.add_rule().unwrap();

    let raw = builder.set.serialize_all(&XmlOptions { escape: false });
    assert!(raw.contains("<subject>Fish & Chips</subject>"));
    assert!(from_xml(&raw, true).is_err());

    let stored = builder.set.serialize_all(&XmlOptions::default());
    assert!(stored.contains("Fish &amp; Chips"));
    assert_eq!(from_xml(&stored, true).unwrap().rules(), builder.set.rules());
}
