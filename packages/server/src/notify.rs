//! Contact-form notifications.
//!
//! One validated submission produces two independent sends: an operator
//! notification and an acknowledgment to the submitter. The pair is
//! best-effort, not atomic — the operation succeeds when the provider
//! accepts either message, and nothing is retried.

use mailer::{EmailMessage, Mailer, MailerConfig};
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::contact::ContactRequest;

pub async fn send_contact_emails(
    mailer: &dyn Mailer,
    config: &MailerConfig,
    form: &ContactRequest,
) -> Result<(), AppError> {
    let operator = EmailMessage {
        from: format!("Contact Form <{}>", config.from_address),
        to: vec![config.admin_address.clone()],
        subject: format!("New Contact Form Submission - {}", form.business_name),
        html: render_operator_email(form),
    };
    let acknowledgment = EmailMessage {
        from: format!("Trendbase <{}>", config.from_address),
        to: vec![form.email.clone()],
        subject: "Thank you for contacting Trendbase".to_string(),
        html: render_acknowledgment_email(form),
    };

    let operator_result = mailer.send(operator).await;
    let acknowledgment_result = mailer.send(acknowledgment).await;

    match (&operator_result, &acknowledgment_result) {
        (Err(op), Err(ack)) => Err(AppError::Provider(format!(
            "both sends rejected (operator: {op}; acknowledgment: {ack})"
        ))),
        _ => {
            if let Err(e) = &operator_result {
                warn!("Operator notification failed: {e}");
            }
            if let Err(e) = &acknowledgment_result {
                warn!("Acknowledgment email failed: {e}");
            }
            if let (Ok(op), Ok(ack)) = (&operator_result, &acknowledgment_result) {
                info!(operator_id = %op.id, acknowledgment_id = %ack.id, "Contact emails sent");
            }
            Ok(())
        }
    }
}

fn render_operator_email(form: &ContactRequest) -> String {
    let phone = form.phone.as_deref().unwrap_or("Not provided");
    let business_type = form.business_type.as_deref().unwrap_or("Not specified");
    let locations = form.locations.as_deref().unwrap_or("Not specified");

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #7c3aed; border-bottom: 2px solid #7c3aed; padding-bottom: 10px;">
    New Contact Form Submission
  </h2>

  <div style="background-color: #f8fafc; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #1f2937; margin-top: 0;">Contact Information</h3>
    <p><strong>Name:</strong> {first_name} {last_name}</p>
    <p><strong>Email:</strong> {email}</p>
    <p><strong>Phone:</strong> {phone}</p>
    <p><strong>Business Name:</strong> {business_name}</p>
    <p><strong>Business Type:</strong> {business_type}</p>
    <p><strong>Number of Locations:</strong> {locations}</p>
  </div>

  <div style="background-color: #fef3c7; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #92400e; margin-top: 0;">Message</h3>
    <p style="white-space: pre-wrap; line-height: 1.6;">{message}</p>
  </div>

  <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #e5e7eb;">
    <p style="color: #6b7280; font-size: 14px;">
      This email was sent from your website contact form.
      Reply directly to {email} to respond to the customer.
    </p>
  </div>
</div>"#,
        first_name = form.first_name,
        last_name = form.last_name,
        email = form.email,
        phone = phone,
        business_name = form.business_name,
        business_type = business_type,
        locations = locations,
        message = form.message,
    )
}

fn render_acknowledgment_email(form: &ContactRequest) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #7c3aed; border-bottom: 2px solid #7c3aed; padding-bottom: 10px;">
    Thank you for reaching out!
  </h2>

  <p>Hi {first_name},</p>

  <p>Thank you for contacting Trendbase about your Google Business Profile optimization needs. We've received your message and our team will get back to you within 24 hours.</p>

  <div style="background-color: #f8fafc; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #1f2937; margin-top: 0;">What happens next?</h3>
    <ul style="color: #374151; line-height: 1.6;">
      <li>Our team will review your business goals and requirements</li>
      <li>We'll prepare a personalized strategy for your local search optimization</li>
      <li>You'll receive a detailed proposal within 24-48 hours</li>
      <li>We'll schedule a free consultation call to discuss your options</li>
    </ul>
  </div>

  <p>In the meantime, feel free to explore our services or check out our blog for tips on local SEO.</p>

  <div style="text-align: center; margin: 30px 0;">
    <a href="https://trendbase.com" style="background-color: #7c3aed; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; display: inline-block;">
      Visit Our Website
    </a>
  </div>

  <p>Best regards,<br>The Trendbase Team</p>

  <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #e5e7eb;">
    <p style="color: #6b7280; font-size: 12px;">
      This is an automated message. Please do not reply to this email.
    </p>
  </div>
</div>"#,
        first_name = form.first_name,
    )
}
