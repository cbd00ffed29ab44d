//! Server-rendered HTML pages.
//!
//! Every page built on `layout` carries the alert badge and loads
//! `/js/main.js`; error pages use `bare_layout` and load no script.
//! All document text is escaped before interpolation.

use axum::response::Html;
use residence_core::{AlertSummary, Building, RoomOccupancy};

const APP_TITLE: &str = "Residence";

/// Which building listing a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Active,
    Removed,
}

impl ListKind {
    fn heading(self) -> &'static str {
        match self {
            Self::Active => "Buildings",
            Self::Removed => "Removed buildings",
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            Self::Active => "No buildings yet. Add one to get started.",
            Self::Removed => "No removed buildings.",
        }
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(title: &str, alerts: &AlertSummary, body: &str) -> Html<String> {
    let mut alert_items = String::new();
    for alert in &alerts.recent {
        alert_items.push_str(&format!(
            "<li class=\"dropdown-item\">{}</li>",
            escape_html(&alert.message)
        ));
    }
    if alert_items.is_empty() {
        alert_items.push_str("<li class=\"dropdown-item\">No new alerts</li>");
    }

    Html(format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title} | {APP_TITLE}</title>\
<link rel=\"stylesheet\" href=\"/css/style.css\"></head><body>\
<nav class=\"topbar\"><a class=\"brand\" href=\"/\">{APP_TITLE}</a>\
<ul class=\"nav-links\">\
<li><a href=\"/\">Buildings</a></li>\
<li><a href=\"/newBuilding\">New building</a></li>\
<li><a href=\"/removedBuildings\">Removed</a></li>\
</ul>\
<div class=\"dropdown\"><a class=\"dropdown-toggle\" href=\"#\" data-toggle=\"dropdown\">Alerts \
<span class=\"badge-counter\">{pending}</span></a>\
<ul class=\"dropdown-menu\">{alert_items}</ul></div>\
</nav><main>{body}</main>\
<script src=\"/js/main.js\"></script></body></html>",
        title = escape_html(title),
        pending = alerts.pending,
    ))
}

fn bare_layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>{title} | {APP_TITLE}</title>\
<link rel=\"stylesheet\" href=\"/css/style.css\"></head><body>\
<main>{body}<p><a href=\"/\">Back to buildings</a></p></main></body></html>",
        title = escape_html(title),
    ))
}

pub fn building_list(kind: ListKind, buildings: &[Building], alerts: &AlertSummary) -> Html<String> {
    let heading = kind.heading();
    if buildings.is_empty() {
        let body = format!(
            "<h1>{heading}</h1><p class=\"empty\">{}</p>",
            kind.empty_message()
        );
        return layout(heading, alerts, &body);
    }

    let mut rows = String::new();
    for building in buildings {
        rows.push_str(&building_row(kind, building));
    }

    let body = format!(
        "<h1>{heading}</h1>\
<table class=\"buildings\"><thead><tr>\
<th>Name</th><th>Address</th><th>Rooms</th><th>Occupied</th><th>Staff</th><th></th>\
</tr></thead><tbody>{rows}</tbody></table>"
    );
    layout(heading, alerts, &body)
}

fn building_row(kind: ListKind, building: &Building) -> String {
    let id = building.uuid;
    let actions = match kind {
        ListKind::Active => format!(
            "<form method=\"POST\" action=\"/building/remove/{id}?_method=PUT\">\
<button class=\"remove\" type=\"submit\">Remove</button></form>"
        ),
        ListKind::Removed => format!(
            "<form method=\"POST\" action=\"/building/restore/{id}?_method=PUT\">\
<button class=\"restore\" type=\"submit\">Restore</button></form>\
<form method=\"POST\" action=\"/building/{id}?_method=DELETE\">\
<button class=\"delete\" type=\"submit\">Delete</button></form>"
        ),
    };

    format!(
        "<tr data-building-id=\"{id}\"><td><a href=\"/todo/{id}\">{name}</a></td>\
<td>{address}</td><td>{rooms}</td><td>{occupied}</td><td>{staff}</td>\
<td class=\"actions\">{actions}</td></tr>",
        name = escape_html(&building.name),
        address = escape_html(&building.address),
        rooms = building.rooms.len(),
        occupied = building.occupied_rooms(),
        staff = building.staff,
    )
}

pub fn new_building_form(alerts: &AlertSummary) -> Html<String> {
    let body = "<h1>New building</h1>\
<form class=\"building-form\" method=\"POST\" action=\"/createBuilding\">\
<label>Name <input type=\"text\" name=\"name\" required></label>\
<label>Address <input type=\"text\" name=\"address\"></label>\
<label>Rooms <input type=\"number\" name=\"rooms\" min=\"0\" value=\"0\"></label>\
<label>Staff <input type=\"number\" name=\"staff\" min=\"0\" value=\"0\"></label>\
<button type=\"submit\">Create</button></form>";
    layout("New building", alerts, body)
}

pub fn building_detail(
    building: &Building,
    occupancy: &[RoomOccupancy],
    alerts: &AlertSummary,
) -> Html<String> {
    let mut rooms = String::new();
    for slot in occupancy {
        let occupant = match &slot.resident {
            Some(resident) => format!(
                "{} <span class=\"contact\">{}</span>",
                escape_html(&resident.name),
                escape_html(&resident.contact)
            ),
            None => "<span class=\"vacant\">Vacant</span>".to_string(),
        };
        rooms.push_str(&format!(
            "<tr><td>{}</td><td>{occupant}</td></tr>",
            slot.room
        ));
    }
    if rooms.is_empty() {
        rooms.push_str("<tr><td colspan=\"2\">No rooms</td></tr>");
    }

    let status = if building.listed { "Active" } else { "Removed" };
    let body = format!(
        "<h1>{name}</h1>\
<dl class=\"building-detail\">\
<dt>Address</dt><dd>{address}</dd>\
<dt>Staff</dt><dd>{staff}</dd>\
<dt>Status</dt><dd class=\"status\">{status}</dd>\
</dl>\
<table class=\"rooms\"><thead><tr><th>Room</th><th>Resident</th></tr></thead>\
<tbody>{rooms}</tbody></table>",
        name = escape_html(&building.name),
        address = escape_html(&building.address),
        staff = building.staff,
    );
    layout(&building.name, alerts, &body)
}

pub fn completed_page(alerts: &AlertSummary) -> Html<String> {
    layout(
        "Completed",
        alerts,
        "<h1>Completed</h1><p>All changes have been saved.</p>",
    )
}

pub fn not_found_page() -> Html<String> {
    bare_layout(
        "Not found",
        "<h1>Not found</h1><p>The requested building does not exist.</p>",
    )
}

pub fn bad_request_page(message: &str) -> Html<String> {
    bare_layout(
        "Bad request",
        &format!("<h1>Bad request</h1><p>{}</p>", escape_html(message)),
    )
}

pub fn error_page() -> Html<String> {
    bare_layout(
        "Error",
        "<h1>Something went wrong</h1><p>The request could not be completed.</p>",
    )
}
