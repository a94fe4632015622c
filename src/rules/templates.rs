//! Canned notification texts for rule drafts
//!
//! Placeholders such as `$$loyalty_Name_value$$` are expanded by the event
//! engine, not here.

use crate::rules::{Rule, RuleAction};

#[derive(Debug, Clone, Copy)]
pub struct EmailTemplate {
    pub name: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct TextTemplate {
    pub name: &'static str,
    pub text: &'static str,
}

pub const EMAIL_TEMPLATES: &[EmailTemplate] = &[
    EmailTemplate {
        name: "Customer Complaint - Low Rating",
        subject: "Alert! - Customer has provided a low rating",
        body: r#"<p>Hello Admin,</p>
<p>A customer has expressed dissatisfaction with our service:</p>
<p>
    <strong>Customer Name:</strong> $$loyalty_Name_value$$<br>
    <strong>Telephone:</strong> $$loyalty_Telephone_value$$<br>
    <strong>Email:</strong> $$loyalty_Email_value$$<br>
    <strong>Location:</strong> $$emoSignature_Location_value$$<br>
    <strong>Rating:</strong> $$q2091_emote$$<br>
    <strong>Comment:</strong> $$gp3700_c1_comment_value$$
</p>
<p>Please address this issue promptly.</p>

<p>Best Regards,</p>
<p><strong>Customer Support Team</strong></p>"#,
    },
    EmailTemplate {
        name: "New Feedback Received",
        subject: "New Feedback Received - $$emoSignature_Location_value$$",
        body: r#"<p>Hello Team,</p>
<p>We have received new feedback from a customer:</p>
<p>
    <strong>Customer Name:</strong> $$loyalty_Name_value$$<br>
    <strong>Location:</strong> $$emoSignature_Location_value$$<br>
    <strong>Rating:</strong> $$q2091_emote$$<br>
    <strong>Comment:</strong> $$gp3700_c1_comment_value$$
</p>
<p>Please review this feedback for continuous improvement.</p>

<p>Best Regards,</p>
<p><strong>Feedback Management System</strong></p>"#,
    },
    EmailTemplate {
        name: "Thank You - Positive Feedback",
        subject: "Thank You for Your Positive Feedback",
        body: r#"<p>Dear $$loyalty_Name_value$$,</p>

<p>Thank you for your positive feedback about our services at $$emoSignature_Location_value$$. We're delighted to hear that you had a great experience with us.</p>

<p>We look forward to serving you again soon!</p>

<p>Best Regards,</p>
<p><strong>Customer Experience Team</strong></p>"#,
    },
];

pub const SMS_TEMPLATES: &[TextTemplate] = &[
    TextTemplate {
        name: "Customer Complaint Alert",
        text: "ALERT: Customer complaint received from $$loyalty_Name_value$$ at $$emoSignature_Location_value$$. Rating: $$q2091_emote$$. Contact: $$loyalty_Telephone_value$$",
    },
    TextTemplate {
        name: "New Feedback Alert",
        text: "New feedback received from $$loyalty_Name_value$$ for $$emoSignature_Location_value$$. Rating: $$q2091_emote$$. Please review.",
    },
    TextTemplate {
        name: "Thank You Message",
        text: "Thank you for your feedback, $$loyalty_Name_value$$! We value your input and are committed to providing excellent service.",
    },
];

pub const INCIDENT_DESCRIPTIONS: &[TextTemplate] = &[
    TextTemplate {
        name: "Customer Complaint",
        text: "Customer Name: $$loyalty_Name_value$$
Customer Email: $$loyalty_Email_value$$
Customer Telephone: $$loyalty_Telephone_value$$
Location: $$emoSignature_Location_value$$
Rating: $$q2091_emote$$
Comment: $$gp3700_c1_comment_value$$",
    },
    TextTemplate {
        name: "Product Issue",
        text: "Customer Name: $$loyalty_Name_value$$
Customer Email: $$loyalty_Email_value$$
Product: $$emoSignature_Product_value$$
Issue Description: $$gp3700_c1_comment_value$$
Attachment: $$mediafile_p3849$$",
    },
    TextTemplate {
        name: "Staff Recognition",
        text: "Staff Member: $$gp3487_c1_comment_value$$
Location: $$emoSignature_Location_value$$
Customer Comment: $$gp3700_c1_comment_value$$
Customer Name: $$loyalty_Name_value$$",
    },
];

/// Apply the named template matching the draft's action kind.
///
/// Email templates set subject and body, SMS templates the body, incident
/// templates the description. Returns false when no template of that name
/// exists for the action kind; the draft is then unchanged.
pub fn apply(draft: &mut Rule, name: &str) -> bool {
    match &mut draft.action {
        RuleAction::Email(email) => match EMAIL_TEMPLATES.iter().find(|t| t.name == name) {
            Some(t) => {
                email.subject = t.subject.to_string();
                email.body = t.body.to_string();
                true
            }
            None => false,
        },
        RuleAction::Sms(sms) => match SMS_TEMPLATES.iter().find(|t| t.name == name) {
            Some(t) => {
                sms.sms_body = t.text.to_string();
                true
            }
            None => false,
        },
        RuleAction::Incident(incident) => match INCIDENT_DESCRIPTIONS.iter().find(|t| t.name == name) {
            Some(t) => {
                incident.description = t.text.to_string();
                true
            }
            None => false,
        },
    }
}
