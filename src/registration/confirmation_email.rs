use crate::configuration::EventSettings;
use crate::domain::AddressVerification;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationEmail {
    pub subject: String,
    pub html_content: String,
}

impl ConfirmationEmail {
    /// Builds the message sent after a successful registration. The sticker
    /// paragraph depends on whether an address was given and verified.
    pub fn compose(event: &EventSettings, address: Option<&AddressVerification>) -> Self {
        let event_name = escape_html(&event.name);
        let mut html_content = format!(
            "<p>Hey there,</p>\
            <p>Thank you so much for registering to take part in {event_name}. \
            We hope you will enjoy the event.</p>\
            <p>Please feel free to share the event with your friends and colleagues \
            so we can positively impact as many people as possible.</p>"
        );
        match address {
            Some(address) if address.address_verified => html_content.push_str(
                "<p>We'll be sending out stickers closer to the event. \
                We successfully verified your address so there shouldn't be \
                any issues with getting them to you.</p>",
            ),
            Some(address) => html_content.push_str(&format!(
                "<p>We'll be sending out stickers closer to the event. \
                Just to let you know - we struggled to verify your address. \
                If {} is correct, there shouldn't be a problem, but if it's incorrect \
                please get in touch with us so we can amend it.</p>",
                escape_html(&address.address)
            )),
            None => {}
        }
        match &event.follow_url {
            Some(url) => html_content.push_str(&format!(
                "<p>We'll send you a couple of important updates before the day, \
                and if you want more regular updates consider \
                <a href=\"{}\">following us</a>.</p>",
                escape_html(url)
            )),
            None => html_content
                .push_str("<p>We'll send you a couple of important updates before the day.</p>"),
        }
        html_content.push_str(&format!(
            "<p>Much love</p>\
            <p>{}</p>",
            escape_html(&event.team_name)
        ));
        Self {
            subject: format!("Registration for {}", event.name),
            html_content,
        }
    }
}

// Addresses are typed by attendees and end up inside the HTML body.
fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
