use crate::rules::{Rule, RuleAction};

/// Output switches for the `<cepRules>` generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// Escape `&`, `<` and `>` in text nodes and attribute values.
    /// When off, values are inserted verbatim.
    pub escape: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self { escape: true }
    }
}

/// Converts a list of rules into a `<cepRules>` document
///
/// # Examples
/// ```rust
/// use cxgen::rules::{ActionKind, Rule, RuleAction, EmailAction, XmlOptions, to_xml};
///
/// let mut rule = Rule::new(1, ActionKind::Email);
/// rule.params.question_id = "q2091".to_string();
/// rule.action = RuleAction::Email(EmailAction {
///     to: "a@b.com".into(),
///     subject: "Alert".into(),
///     body: String::new(),
/// });
/// let xml = to_xml(&[rule], &XmlOptions::default());
/// assert!(xml.contains("<to>a@b.com</to>"));
/// ```
pub fn to_xml(rules: &[Rule], options: &XmlOptions) -> String {
    let mut generator = XmlGenerator::new(options.escape);
    generator.generate(rules)
}

/// XML generation helper struct
#[derive(Debug)]
struct XmlGenerator {
    indent_level: usize,
    buffer: String,
    escape: bool,
}

impl XmlGenerator {
    fn new(escape: bool) -> Self {
        Self {
            indent_level: 0,
            buffer: String::new(),
            escape,
        }
    }

    fn generate(&mut self, rules: &[Rule]) -> String {
        self.buffer.push_str("<?xml version=\"1.0\"?>\n");
        self.add_line("<cepRules>");
        self.indent();
        for rule in rules {
            self.generate_rule(rule);
        }
        self.unindent();
        // no trailing newline after the root
        self.buffer.push_str("</cepRules>");
        std::mem::take(&mut self.buffer)
    }

    fn generate_rule(&mut self, rule: &Rule) {
        let id = rule.id.to_string();
        let time_window = rule.time_window.to_string();
        self.add_opening_tag("cepRule", &[("id", &id), ("timeWindow", &time_window)]);
        self.indent();

        self.generate_params(rule);
        self.generate_actions(rule);

        self.unindent();
        self.add_closing_tag("cepRule");
    }

    /// Mandatory drill-down param plus the optional emote comparison
    fn generate_params(&mut self, rule: &Rule) {
        self.add_opening_tag("params", &[]);
        self.indent();

        self.add_opening_tag("param", &[]);
        self.indent();
        self.add_text_element("name", "percepticDrillDown");
        self.add_text_element("operator", "eq");
        let question = format!("\"{}\"", rule.params.question_id);
        self.add_text_element("value", &question);
        self.unindent();
        self.add_closing_tag("param");

        if rule.params.use_join_param {
            self.add_text_element("joinOperator", "and");
            self.add_opening_tag("joinParam", &[]);
            self.indent();
            self.add_text_element("name", "emoteNumericValue");
            self.add_text_element("operator", &rule.params.operator);
            self.add_text_element("value", &rule.params.value);
            self.unindent();
            self.add_closing_tag("joinParam");
        }

        self.unindent();
        self.add_closing_tag("params");
    }

    fn generate_actions(&mut self, rule: &Rule) {
        self.add_opening_tag("engagementActions", &[]);
        self.indent();
        self.add_opening_tag("action", &[]);
        self.indent();

        self.add_text_element("type", rule.action.kind().as_str());
        self.add_opening_tag("data", &[]);
        self.indent();
        self.generate_action_data(&rule.action);
        self.unindent();
        self.add_closing_tag("data");

        if let Some(period) = rule.validity_period.as_deref().filter(|p| !p.is_empty()) {
            self.add_text_element("validityPeriod", period);
        }

        self.unindent();
        self.add_closing_tag("action");
        self.unindent();
        self.add_closing_tag("engagementActions");
    }

    /// Type-specific `<data>` children; blank optional fields are omitted
    fn generate_action_data(&mut self, action: &RuleAction) {
        match action {
            RuleAction::Email(email) => {
                self.add_optional_element("to", &email.to);
                self.add_optional_element("subject", &email.subject);
                self.add_text_element("bodyType", "html");
                if !email.body.is_empty() {
                    self.add_cdata_element("body", &email.body);
                }
            }
            RuleAction::Sms(sms) => {
                self.add_text_element("smsType", "smsbody");
                self.add_optional_element("smsTo", &sms.sms_to);
                self.add_optional_element("smsbody", &sms.sms_body);
            }
            RuleAction::Incident(incident) => {
                self.add_optional_element("workflowID", &incident.workflow_id);
                self.add_optional_element("name", &incident.name);
                self.add_optional_element("assignee", &incident.assignee);
                self.add_optional_element("type", &incident.incident_type);
                self.add_optional_element("priority", &incident.priority);
                self.add_optional_element("status", &incident.status);
                if !incident.description.is_empty() {
                    self.add_cdata_element("description", &incident.description);
                }

                if !incident.custom_fields.is_empty() {
                    self.add_opening_tag("customFields", &[]);
                    self.indent();
                    for field in &incident.custom_fields {
                        if field.key.is_empty() || field.value.is_empty() {
                            continue;
                        }
                        self.add_opening_tag("field", &[]);
                        self.indent();
                        self.add_text_element("key", &field.key);
                        self.add_text_element("value", &field.value);
                        self.unindent();
                        self.add_closing_tag("field");
                    }
                    self.unindent();
                    self.add_closing_tag("customFields");
                }
            }
        }
    }

    /// Add indented line to buffer
    fn add_line(&mut self, content: &str) {
        self.buffer.push_str(&self.get_indent());
        self.buffer.push_str(content);
        self.buffer.push('\n');
    }

    /// Add opening tag
    fn add_opening_tag(&mut self, tag: &str, attributes: &[(&str, &str)]) {
        let mut tag_str = format!("<{}", tag);

        for (name, value) in attributes {
            tag_str.push_str(&format!(" {}=\"{}\"", name, self.escape_attr(value)));
        }

        tag_str.push('>');
        self.add_line(&tag_str);
    }

    /// Add closing tag
    fn add_closing_tag(&mut self, tag: &str) {
        self.add_line(&format!("</{}>", tag));
    }

    /// `<tag>text</tag>` on one line
    fn add_text_element(&mut self, tag: &str, text: &str) {
        let line = format!("<{}>{}</{}>", tag, self.escape_text(text), tag);
        self.add_line(&line);
    }

    fn add_optional_element(&mut self, tag: &str, text: &str) {
        if !text.is_empty() {
            self.add_text_element(tag, text);
        }
    }

    /// Free-form text goes out verbatim inside CDATA, on its own lines
    fn add_cdata_element(&mut self, tag: &str, text: &str) {
        self.buffer.push_str(&self.get_indent());
        self.buffer.push_str(&format!("<{}><![CDATA[\n", tag));
        // a literal "]]>" would close the section early
        self.buffer.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
        self.buffer.push_str(&format!("\n]]></{}>\n", tag));
    }

    /// Increase indentation level
    fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    fn unindent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Get current indentation string
    fn get_indent(&self) -> String {
        "  ".repeat(self.indent_level)
    }

    fn escape_text(&self, text: &str) -> String {
        if !self.escape {
            return text.to_string();
        }
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    fn escape_attr(&self, text: &str) -> String {
        if !self.escape {
            return text.to_string();
        }
        self.escape_text(text).replace('"', "&quot;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{ActionKind, CustomFieldValue, EmailAction, IncidentAction, SmsAction};

    fn rule_with(action: RuleAction) -> Rule {
        let mut rule = Rule::new(1, action.kind());
        rule.params.question_id = "q2091".to_string();
        rule.action = action;
        rule
    }

    #[test]
    fn test_empty_document() {
        let xml = to_xml(&[], &XmlOptions::default());
        assert_eq!(xml, "<?xml version=\"1.0\"?>\n<cepRules>\n</cepRules>");
    }

    #[test]
    fn test_email_rule_layout() {
        let rule = rule_with(RuleAction::Email(EmailAction {
            to: "a@b.com".into(),
            subject: "Alert".into(),
            body: "<p>Hi</p>".into(),
        }));
        let expected = r#"<?xml version="1.0"?>
<cepRules>
  <cepRule id="1" timeWindow="5">
    <params>
      <param>
        <name>percepticDrillDown</name>
        <operator>eq</operator>
        <value>"q2091"</value>
      </param>
      <joinOperator>and</joinOperator>
      <joinParam>
        <name>emoteNumericValue</name>
        <operator>gd</operator>
        <value>0</value>
      </joinParam>
    </params>
    <engagementActions>
      <action>
        <type>email</type>
        <data>
          <to>a@b.com</to>
          <subject>Alert</subject>
          <bodyType>html</bodyType>
          <body><![CDATA[
<p>Hi</p>
]]></body>
        </data>
        <validityPeriod>5</validityPeriod>
      </action>
    </engagementActions>
  </cepRule>
</cepRules>"#;
        assert_eq!(to_xml(&[rule], &XmlOptions::default()), expected);
    }

    #[test]
    fn test_join_param_omitted() {
        let mut rule = rule_with(RuleAction::Sms(SmsAction {
            sms_to: "+94770000000".into(),
            sms_body: "Low rating".into(),
        }));
        rule.params.use_join_param = false;

        let xml = to_xml(&[rule], &XmlOptions::default());
        assert!(!xml.contains("joinParam"));
        assert!(!xml.contains("joinOperator"));
        assert!(xml.contains("<smsType>smsbody</smsType>"));
        assert!(xml.contains("<smsTo>+94770000000</smsTo>"));
        assert!(xml.contains("<smsbody>Low rating</smsbody>"));
    }

    #[test]
    fn test_incident_custom_fields_skip_blank_pairs() {
        let rule = rule_with(RuleAction::Incident(IncidentAction {
            workflow_id: "wf1".into(),
            description: "Line one\nLine two".into(),
            custom_fields: vec![
                CustomFieldValue { key: "location".into(), value: "Main".into() },
                CustomFieldValue { key: "".into(), value: "orphan".into() },
            ],
            ..Default::default()
        }));

        let xml = to_xml(&[rule], &XmlOptions::default());
        assert!(xml.contains("<workflowID>wf1</workflowID>"));
        assert!(xml.contains("<description><![CDATA[\nLine one\nLine two\n]]></description>"));
        assert!(xml.contains("<key>location</key>"));
        assert!(!xml.contains("orphan"));
        assert!(!xml.contains("<assignee>"));
    }

    #[test]
    fn test_escaping_toggle() {
        let rule = rule_with(RuleAction::Email(EmailAction {
            to: "a@b.com".into(),
            subject: "Fish & <Chips>".into(),
            body: String::new(),
        }));

        let escaped = to_xml(&[rule.clone()], &XmlOptions::default());
        assert!(escaped.contains("<subject>Fish &amp; &lt;Chips&gt;</subject>"));

        let raw = to_xml(&[rule], &XmlOptions { escape: false });
        assert!(raw.contains("<subject>Fish & <Chips></subject>"));
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let rule = rule_with(RuleAction::Email(EmailAction {
            to: "a@b.com".into(),
            subject: "s".into(),
            body: "a]]>b".into(),
        }));
        let xml = to_xml(&[rule], &XmlOptions::default());
        assert!(xml.contains("a]]]]><![CDATA[>b"));
        assert!(roxmltree::Document::parse(&xml).is_ok());
    }

    #[test]
    fn test_rules_in_list_order() {
        let mut first = rule_with(ActionKind::Incident.empty_action());
        first.id = 9;
        let mut second = first.clone();
        second.id = 2;

        let xml = to_xml(&[first, second], &XmlOptions::default());
        let a = xml.find("id=\"9\"").unwrap();
        let b = xml.find("id=\"2\"").unwrap();
        assert!(a < b);
    }
}
