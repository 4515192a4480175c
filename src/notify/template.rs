use crate::documents::StoredDocument;
use crate::models::rider::Rider;
use crate::notify::{AttachmentRef, Notification};

pub const INSPECTION_SUBJECT: &str = "Inspection Details from Two Wheeler Rental Platform";

const PLATFORM: &str = "Two Wheeler Rental Platform";

pub fn inspection_notice(from: &str, rider: &Rider, document: &StoredDocument) -> Notification {
    let pre_owned = rider.pre_owned.as_deref().unwrap_or("");

    Notification {
        from: from.to_string(),
        to: rider.email.clone(),
        subject: INSPECTION_SUBJECT.to_string(),
        text_body: text_body(rider, pre_owned),
        html_body: html_body(rider, pre_owned),
        attachments: vec![AttachmentRef {
            filename: document.original_name.clone(),
            content_type: document.content_type.clone(),
            path: document.path.clone(),
        }],
    }
}

fn text_body(rider: &Rider, pre_owned: &str) -> String {
    format!(
        "Dear Customer,\n\
         \n\
         Thank you for using our {PLATFORM}. We are in the process of inspecting the details \
         you provided for your rental. Our team will be visiting your location to verify the \
         information and inspect the vehicle.\n\
         \n\
         Please ensure that the following details are accurate:\n\
         \n\
         Name: {name}\n\
         Address: {address}\n\
         Latitude: {latitude}\n\
         Longitude: {longitude}\n\
         Pre-Owned: {pre_owned}\n\
         Phone Number: {phone}\n\
         \n\
         Our team will take pictures of the bike/scooter during the inspection process for \
         verification purposes.\n\
         \n\
         For any queries or concerns, please feel free to reach out to us.\n\
         \n\
         Regards,\n\
         {PLATFORM} Team",
        name = rider.name,
        address = rider.address,
        latitude = rider.location.latitude(),
        longitude = rider.location.longitude(),
        phone = rider.phone_number,
    )
}

fn html_body(rider: &Rider, pre_owned: &str) -> String {
    format!(
        "<h3>Dear Customer,</h3>\n\
         <p>Thank you for using our <strong>{PLATFORM}</strong>. We are in the process of \
         inspecting the details you provided for your rental. Our team will be visiting your \
         location to verify the information and inspect the vehicle.</p>\n\
         <p>Please ensure that the following details are accurate:</p>\n\
         <ul>\n\
         <li><strong>Name :</strong> {name}</li>\n\
         <li><strong>Address :</strong> {address}</li>\n\
         <li><strong>Latitude :</strong> {latitude}</li>\n\
         <li><strong>Longitude :</strong> {longitude}</li>\n\
         <li><strong>Phone Number :</strong> {phone}</li>\n\
         <li><strong>Pre-Owned :</strong> {pre_owned}</li>\n\
         </ul>\n\
         <p>Our team will take pictures of the bike/scooter during the inspection process for \
         verification purposes.</p>\n\
         <p>For any queries or concerns, please feel free to reach out to us.</p>\n\
         <p>Regards,<br>\n<strong>{PLATFORM} Team</strong></p>",
        name = escape_html(&rider.name),
        address = escape_html(&rider.address),
        latitude = rider.location.latitude(),
        longitude = rider.location.longitude(),
        phone = escape_html(&rider.phone_number),
        pre_owned = escape_html(pre_owned),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
