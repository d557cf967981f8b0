//! HTML views for the console. Pure functions from data to markup, no I/O.

use crate::error::Result;
use crate::types::ContainerRecord;
use serde_yaml::Value as YamlValue;

use super::timefmt;

/// Render the index page: one table row per container record
pub fn index_page(records: &[ContainerRecord], index_url: &str) -> Result<String> {
    let table = listing_table(records, index_url)?;
    Ok(page("Containers", index_url, &table))
}

/// Render captured command output (logs, top, convert) line by line
pub fn lines_page(title: &str, output: &str, index_url: &str) -> String {
    let mut body = String::from("<pre>");
    for line in output.lines() {
        body.push_str(&escape(line));
        body.push('\n');
    }
    body.push_str("</pre>");
    page(title, index_url, &body)
}

/// Render a single service's merged compose definition as YAML
pub fn compose_page(
    service: &str,
    definition: Option<&YamlValue>,
    index_url: &str,
) -> Result<String> {
    let body = match definition {
        Some(definition) => {
            let yaml = serde_yaml::to_string(definition)?;
            format!("<pre>{}</pre>", escape(&yaml))
        }
        None => "<p>not declared in compose files</p>".to_string(),
    };
    let title = format!("compose: {}", escape(service));
    Ok(page(&title, index_url, &body))
}

/// Render the exec/run page: command form, captured output, and the full
/// container listing
pub fn exec_page(
    kind: &str,
    service: &str,
    records: &[ContainerRecord],
    command: Option<&str>,
    output: &str,
    index_url: &str,
) -> Result<String> {
    let mut body = format!(
        "<form method=\"post\" action=\"{index_url}{kind}/{svc}\">\
<input type=\"text\" name=\"cmd\" value=\"{cmd}\" size=\"60\">\
<button type=\"submit\">{kind}</button></form>",
        svc = urlencoding::encode(service),
        cmd = escape(command.unwrap_or_default()),
    );
    if !output.is_empty() {
        body.push_str("<pre>");
        for line in output.lines() {
            body.push_str(&escape(line));
            body.push('\n');
        }
        body.push_str("</pre>");
    }
    body.push_str(&listing_table(records, index_url)?);

    let title = format!("{kind}: {}", escape(service));
    Ok(page(&title, index_url, &body))
}

fn listing_table(records: &[ContainerRecord], index_url: &str) -> Result<String> {
    let mut rows = String::new();
    for record in records {
        let state = record
            .live_str("State")
            .unwrap_or_else(|| record.state.as_str());
        let image = record.live_str("Image").unwrap_or("-");
        let created = match record.live.as_ref().and_then(|live| live.get("Created")) {
            Some(value) => {
                let raw = match value.as_str() {
                    Some(s) => s.to_string(),
                    None => value.to_string(),
                };
                timefmt::strftime(&raw, "http")?
            }
            None => "-".to_string(),
        };

        let mut actions = String::new();
        for action in record.actions {
            actions.push_str(&format!(
                "<a href=\"{index_url}{action}/{svc}\">{action}</a> ",
                action = action.as_str(),
                svc = urlencoding::encode(&record.service),
            ));
        }

        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&record.service),
            escape(state),
            escape(image),
            escape(&created),
            actions,
        ));
    }
    if rows.is_empty() {
        rows.push_str("<tr><td colspan=\"5\">No containers or services found.</td></tr>");
    }

    Ok(format!(
        "<table border=\"1\" cellpadding=\"4\">\
<tr><th>Service</th><th>State</th><th>Image</th><th>Created</th><th>Actions</th></tr>\
{rows}</table>"
    ))
}

fn page(title: &str, index_url: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
<title>{title} - Convoy</title></head><body>\
<p><a href=\"{index_url}\">containers</a></p>\
{body}\
</body></html>"
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContainerState;
    use serde_json::json;

    fn record(service: &str, state: ContainerState) -> ContainerRecord {
        ContainerRecord {
            service: service.to_string(),
            state,
            live: None,
            compose: None,
            actions: state.actions(),
        }
    }

    #[test]
    fn index_lists_every_record_with_its_actions() {
        let records = vec![
            record("web", ContainerState::Disabled),
            record("db", ContainerState::Disabled),
        ];
        let html = index_page(&records, "/").unwrap();
        assert!(html.contains("<td>web</td>"));
        assert!(html.contains("<td>db</td>"));
        assert!(html.contains("href=\"/up/web\""));
        assert!(html.contains("href=\"/compose/db\""));
        // disabled services offer no exec
        assert!(!html.contains("href=\"/exec/web\""));
    }

    #[test]
    fn index_links_honor_the_base_url() {
        let records = vec![record("web", ContainerState::Disabled)];
        let html = index_page(&records, "/console/").unwrap();
        assert!(html.contains("href=\"/console/up/web\""));
        assert!(html.contains("href=\"/console/\""));
    }

    #[test]
    fn created_field_is_rendered_through_the_time_filter() {
        let mut rec = record("web", ContainerState::Running);
        let fields = json!({"State": "running", "Image": "nginx", "Created": 0});
        rec.live = Some(fields.as_object().unwrap().clone());
        let html = index_page(&[rec], "/").unwrap();
        assert!(html.contains("Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn malformed_created_field_errors() {
        let mut rec = record("web", ContainerState::Running);
        let fields = json!({"Created": "not-a-time"});
        rec.live = Some(fields.as_object().unwrap().clone());
        assert!(index_page(&[rec], "/").is_err());
    }

    #[test]
    fn output_lines_are_escaped() {
        let html = lines_page("logs: web", "hello <world>\nsecond", "/");
        assert!(html.contains("hello &lt;world&gt;"));
        assert!(html.contains("second"));
    }

    #[test]
    fn compose_page_renders_yaml_or_placeholder() {
        let definition: YamlValue = serde_yaml::from_str("image: nginx\n").unwrap();
        let html = compose_page("web", Some(&definition), "/").unwrap();
        assert!(html.contains("image: nginx"));

        let html = compose_page("ghost", None, "/").unwrap();
        assert!(html.contains("not declared"));
    }

    #[test]
    fn exec_page_has_form_and_output() {
        let records = vec![record("web", ContainerState::Disabled)];
        let html = exec_page("exec", "web", &records, Some("ls -l"), "total 0", "/").unwrap();
        assert!(html.contains("action=\"/exec/web\""));
        assert!(html.contains("value=\"ls -l\""));
        assert!(html.contains("total 0"));
        assert!(html.contains("<td>web</td>"));
    }
}
