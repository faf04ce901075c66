//! The public signup page a one-time link opens.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::LinkDetails;

pub const SIGNUP_PATH: &str = "/public/onetimelink";

/// `<origin>/public/onetimelink?token=<token>`. Tokens are base64url, so no
/// query escaping is needed.
pub fn signup_url(origin: &str, token: &str) -> String {
    format!("{}{}?token={}", origin.trim_end_matches('/'), SIGNUP_PATH, token)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameField {
    pub name: String,
    pub label: String,
}

/// One name input per place left on the link.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub token: String,
    pub title: String,
    pub event_name: String,
    pub venue_name: String,
    pub starts_at: String,
    pub fields: Vec<NameField>,
    pub plus_one: bool,
    pub needs_confirmation: bool,
    pub open: bool,
}

impl SignupForm {
    pub fn from_details(details: &LinkDetails, token: &str) -> Self {
        let link = &details.link;
        let places = link.remaining().max(0) as usize;
        let fields = (1..=places)
            .map(|n| NameField {
                name: format!("name{}", n),
                label: format!("Guest {}", n),
            })
            .collect();

        Self {
            token: token.to_string(),
            title: link.name.clone(),
            event_name: details.event.name.clone(),
            venue_name: details.venue.name.clone(),
            starts_at: details.event.starts_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            fields,
            plus_one: link.plus_one,
            needs_confirmation: link.needs_confirmation,
            open: link.active && !details.guest_list.closed && places > 0,
        }
    }

    pub fn render_html(&self) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            "<section class=\"signup\">\n<h1>{}</h1>\n<p>{} at {}, {}</p>\n",
            encode_text(&self.title),
            encode_text(&self.event_name),
            encode_text(&self.venue_name),
            encode_text(&self.starts_at),
        ));

        if !self.open {
            html.push_str("<p class=\"closed\">This link can no longer be used.</p>\n</section>\n");
            return html;
        }

        html.push_str(&format!(
            "<form method=\"post\" action=\"{}\">\n<input type=\"hidden\" name=\"token\" value=\"{}\">\n",
            SIGNUP_PATH,
            encode_double_quoted_attribute(&self.token),
        ));
        for field in &self.fields {
            html.push_str(&format!(
                "<label>{} <input type=\"text\" name=\"{}\"></label>\n",
                encode_text(&field.label),
                encode_double_quoted_attribute(&field.name),
            ));
        }
        if self.plus_one {
            html.push_str("<p class=\"note\">Each guest may bring a plus one.</p>\n");
        }
        if self.needs_confirmation {
            html.push_str("<p class=\"note\">Names are confirmed by the organizer.</p>\n");
        }
        html.push_str("<button type=\"submit\">Sign up</button>\n</form>\n</section>\n");
        html
    }
}
