use std::fmt::Write as _;

use shared_models::appointment::Appointment;

use crate::models::{ConsoleSnapshot, Notice, StatusTone};

pub const MISSING_FIELD_PLACEHOLDER: &str = "N/A";
pub const EMPTY_APPOINTMENTS_MESSAGE: &str = "No appointments booked yet.";
pub const LOADING_APPOINTMENTS_MESSAGE: &str = "Loading appointments...";

const PAGE_STYLE: &str = r#"
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #f8fafc; color: #0f172a; padding: 32px;
    }
    main { max-width: 960px; margin: 0 auto; display: flex; flex-direction: column; gap: 24px; }
    h1 { font-size: 26px; }
    h2 { font-size: 18px; margin-bottom: 12px; }
    section { background: white; border: 1px solid #e2e8f0; border-radius: 12px; padding: 20px; }
    label { display: block; font-size: 14px; color: #475569; margin-bottom: 4px; }
    input {
      width: 100%; padding: 10px 12px; margin-bottom: 12px;
      border: 1px solid #cbd5e1; border-radius: 8px; font-size: 15px;
    }
    .actions { display: flex; gap: 12px; flex-wrap: wrap; }
    .btn {
      padding: 10px 18px; border-radius: 8px; font-size: 15px;
      cursor: pointer; border: none; background: #2563eb; color: white;
    }
    .btn-secondary { background: white; color: #1e293b; border: 1px solid #cbd5e1; }
    .btn:disabled { opacity: 0.5; cursor: not-allowed; }
    .notice { background: #fef3c7; color: #92400e; border-radius: 8px; padding: 12px; }
    .status { border-radius: 8px; padding: 12px; margin-top: 12px; }
    .status.info { background: #eff6ff; color: #1d4ed8; }
    .status.success { background: #f0fdf4; color: #15803d; }
    .status.error { background: #fef2f2; color: #b91c1c; }
    .call-sid { font-family: monospace; font-size: 13px; color: #64748b; margin-top: 8px; }
    .busy, .empty { color: #64748b; padding: 16px 0; }
    table { width: 100%; border-collapse: collapse; font-size: 14px; }
    th, td { text-align: left; padding: 8px; border-bottom: 1px solid #e2e8f0; }
    th { color: #475569; font-weight: 600; }
    .header-row { display: flex; justify-content: space-between; align-items: center; }
"#;

/// Renders the whole console page from a state snapshot.
///
/// While a call or an appointment load is pending the page asks the browser
/// to reload itself so the busy indicators clear on their own.
pub fn render_page(snapshot: &ConsoleSnapshot, notice: Option<&Notice>) -> String {
    let busy = snapshot.loading || snapshot.appointments_loading;

    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if busy {
        html.push_str("  <meta http-equiv=\"refresh\" content=\"2\">\n");
    }
    html.push_str("  <title>Appointment Call Console</title>\n");
    let _ = writeln!(html, "  <style>{}</style>", PAGE_STYLE);
    html.push_str("</head>\n<body>\n<main>\n");
    html.push_str("<h1>Appointment Call Console</h1>\n");

    if let Some(notice) = notice {
        let _ = writeln!(
            html,
            "<div class=\"notice\" role=\"alert\">{}</div>",
            escape_html(&notice.text)
        );
    }

    render_call_section(&mut html, snapshot);
    render_appointments_section(&mut html, snapshot);

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_call_section(html: &mut String, snapshot: &ConsoleSnapshot) {
    html.push_str("<section id=\"call\">\n<h2>Start a booking call</h2>\n");
    html.push_str("<form method=\"post\" action=\"/calls\">\n");
    let _ = writeln!(
        html,
        "  <label for=\"phone_number\">Phone number</label>\n  \
         <input id=\"phone_number\" name=\"phone_number\" type=\"tel\" placeholder=\"+1 555 123 4567\" value=\"{}\">",
        escape_html(&snapshot.draft.phone_number)
    );
    let _ = writeln!(
        html,
        "  <label for=\"patient_name\">Patient name (optional)</label>\n  \
         <input id=\"patient_name\" name=\"patient_name\" type=\"text\" value=\"{}\">",
        escape_html(&snapshot.draft.patient_name)
    );
    html.push_str("  <div class=\"actions\">\n");
    if snapshot.loading {
        html.push_str("    <button class=\"btn\" type=\"submit\" disabled>Calling...</button>\n");
    } else {
        html.push_str("    <button class=\"btn\" type=\"submit\">Make Call</button>\n");
    }
    html.push_str("  </div>\n</form>\n");

    html.push_str("<form method=\"post\" action=\"/calls/status\">\n  <div class=\"actions\">\n");
    if snapshot.can_check_status() {
        html.push_str(
            "    <button class=\"btn btn-secondary\" type=\"submit\">Check Call Status</button>\n",
        );
    } else {
        html.push_str(
            "    <button class=\"btn btn-secondary\" type=\"submit\" disabled>Check Call Status</button>\n",
        );
    }
    html.push_str("  </div>\n</form>\n");

    if let Some(status) = &snapshot.status {
        let tone = match status.tone {
            StatusTone::Info => "info",
            StatusTone::Success => "success",
            StatusTone::Error => "error",
        };
        let _ = writeln!(
            html,
            "<div class=\"status {}\" role=\"status\">{}</div>",
            tone,
            escape_html(&status.text)
        );
    }

    if let Some(call_sid) = &snapshot.call_sid {
        let _ = writeln!(
            html,
            "<div class=\"call-sid\">Last call: {}</div>",
            escape_html(call_sid)
        );
    }

    html.push_str("</section>\n");
}

fn render_appointments_section(html: &mut String, snapshot: &ConsoleSnapshot) {
    html.push_str("<section id=\"appointments\">\n<div class=\"header-row\">\n");
    html.push_str("  <h2>Booked appointments</h2>\n");
    html.push_str(
        "  <form method=\"post\" action=\"/appointments/refresh\">\
         <button class=\"btn btn-secondary\" type=\"submit\">Refresh</button></form>\n",
    );
    html.push_str("</div>\n");

    if snapshot.appointments_loading {
        let _ = writeln!(html, "<p class=\"busy\">{}</p>", LOADING_APPOINTMENTS_MESSAGE);
    }

    if snapshot.appointments.is_empty() {
        if !snapshot.appointments_loading {
            let _ = writeln!(html, "<p class=\"empty\">{}</p>", EMPTY_APPOINTMENTS_MESSAGE);
        }
    } else {
        html.push_str("<table>\n<thead><tr>");
        for heading in ["Name", "Phone", "Doctor", "Date", "Time", "Booked At"] {
            let _ = write!(html, "<th>{}</th>", heading);
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for appointment in &snapshot.appointments {
            render_appointment_row(html, appointment);
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</section>\n");
}

fn render_appointment_row(html: &mut String, appointment: &Appointment) {
    let booked_at = appointment.booking_timestamp.format("%Y-%m-%d %H:%M UTC").to_string();
    let cells = [
        appointment.display_name(),
        Some(appointment.phone_number.as_str()),
        appointment.display_doctor(),
        appointment.display_date(),
        appointment.display_time(),
        Some(booked_at.as_str()),
    ];

    let _ = write!(
        html,
        "<tr class=\"appointment-row\" data-id=\"{}\">",
        escape_html(&appointment.id)
    );
    for cell in cells {
        let _ = write!(
            html,
            "<td>{}</td>",
            escape_html(cell.unwrap_or(MISSING_FIELD_PLACEHOLDER))
        );
    }
    html.push_str("</tr>\n");
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
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
