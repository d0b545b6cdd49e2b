use htmlescape::encode_minimal;
use serde::Deserialize;

/// Business details rendered into the emails sent on the company's behalf.
#[derive(Debug, Clone, Deserialize)]
pub struct Branding {
    pub company_name: String,
    pub website_url: String,
    pub contact_email: String,
    pub contact_phone: String,
}

pub const NEWSLETTER_SUBJECT: &str = "Thank you for subscribing to the Transluga newsletter!";
pub const CONTACT_SUBJECT: &str = "We received your message - Transluga";

pub fn newsletter_autoresponse(branding: &Branding) -> String {
    wrap(
        branding,
        "Thank You for Subscribing!",
        "there",
        &format!(
            "<p>Thank you for subscribing to the {company} newsletter. We're excited to share \
             translation tips, industry insights and special offers with you.</p>\
             <p>You'll start receiving our newsletter at this email address shortly.</p>\
             <p>If you have any questions, contact us at \
             <a href=\"mailto:{email}\">{email}</a>.</p>",
            company = encode_minimal(&branding.company_name),
            email = encode_minimal(&branding.contact_email),
        ),
    )
}

pub fn contact_autoresponse(branding: &Branding, name: &str) -> String {
    wrap(
        branding,
        "We've Received Your Message",
        name,
        &format!(
            "<p>Thank you for contacting {company}. We've received your message and our team \
             will review it shortly.</p>\
             <p>We typically respond within 24-48 business hours. If your matter is urgent, \
             please call us at {phone}.</p>",
            company = encode_minimal(&branding.company_name),
            phone = encode_minimal(&branding.contact_phone),
        ),
    )
}

fn wrap(branding: &Branding, heading: &str, name: &str, body: &str) -> String {
    format!(
        "<html><body style=\"font-family: Arial, sans-serif; line-height: 1.6; color: #333;\">\
         <h2>{heading}</h2>\
         <p>Hello {name},</p>\
         {body}\
         <p><strong>{company}</strong><br />{phone}<br />\
         <a href=\"{website}\">{website}</a></p>\
         </body></html>",
        heading = heading,
        name = encode_minimal(name),
        body = body,
        company = encode_minimal(&branding.company_name),
        phone = encode_minimal(&branding.contact_phone),
        website = encode_minimal(&branding.website_url),
    )
}
