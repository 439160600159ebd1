//! Builders and readers for Notion database property values.
//!
//! Builders produce the JSON shape Notion expects when writing a property. Readers extract the plain value from the
//! shape Notion returns, and return `None` when the property is absent, empty or of another type.

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

pub type Properties = Map<String, Value>;

pub fn title(text: &str) -> Value {
    json!({ "title": [{ "text": { "content": text } }] })
}

pub fn rich_text(text: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": text } }] })
}

pub fn date(date: NaiveDate) -> Value {
    json!({ "date": { "start": date.format("%Y-%m-%d").to_string() } })
}

pub fn email(address: &str) -> Value {
    json!({ "email": address })
}

pub fn phone_number(number: &str) -> Value {
    json!({ "phone_number": number })
}

pub fn number<N: Into<f64>>(n: N) -> Value {
    json!({ "number": n.into() })
}

pub fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

/// A database filter matching rows whose select property equals `name`.
pub fn select_equals(property: &str, name: &str) -> Value {
    json!({ "property": property, "select": { "equals": name } })
}

fn join_text(items: &Value) -> Option<String> {
    let text = items
        .as_array()?
        .iter()
        .filter_map(|item| item["plain_text"].as_str().or_else(|| item["text"]["content"].as_str()))
        .collect::<String>();
    Some(text).filter(|s| !s.is_empty())
}

pub fn read_title(props: &Properties, name: &str) -> Option<String> {
    join_text(&props.get(name)?["title"])
}

pub fn read_rich_text(props: &Properties, name: &str) -> Option<String> {
    join_text(&props.get(name)?["rich_text"])
}

/// Reads the start of a date property. Date-times are truncated to their date.
pub fn read_date(props: &Properties, name: &str) -> Option<NaiveDate> {
    let start = props.get(name)?["date"]["start"].as_str()?;
    let day = start.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

pub fn read_email(props: &Properties, name: &str) -> Option<String> {
    props.get(name)?["email"].as_str().map(String::from)
}

pub fn read_phone_number(props: &Properties, name: &str) -> Option<String> {
    props.get(name)?["phone_number"].as_str().map(String::from)
}

pub fn read_number(props: &Properties, name: &str) -> Option<f64> {
    props.get(name)?["number"].as_f64()
}

pub fn read_select(props: &Properties, name: &str) -> Option<String> {
    props.get(name)?["select"]["name"].as_str().map(String::from)
}

#[cfg(test)]
mod test {
    use super::*;

    fn props(pairs: &[(&str, Value)]) -> Properties {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn builders_produce_notion_shapes() {
        assert_eq!(title("Villa Serenity")["title"][0]["text"]["content"], "Villa Serenity");
        assert_eq!(rich_text("order_1")["rich_text"][0]["text"]["content"], "order_1");
        let d = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(date(d)["date"]["start"], "2025-01-10");
        assert_eq!(number(49_999.0)["number"], 49_999.0);
        assert_eq!(number(3)["number"], 3.0);
        assert_eq!(select("Pending")["select"]["name"], "Pending");
        assert_eq!(select_equals("Status", "Pending")["select"]["equals"], "Pending");
    }

    #[test]
    fn readers_accept_what_builders_write() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let p = props(&[
            ("Villa", title("Villa Serenity")),
            ("Order", rich_text("order_1")),
            ("Check Out", date(d)),
            ("Email", email("a@b.co")),
            ("Phone", phone_number("9876543210")),
            ("Amount", number(49_999.0)),
            ("Status", select("Completed")),
        ]);
        assert_eq!(read_title(&p, "Villa").as_deref(), Some("Villa Serenity"));
        assert_eq!(read_rich_text(&p, "Order").as_deref(), Some("order_1"));
        assert_eq!(read_date(&p, "Check Out"), Some(d));
        assert_eq!(read_email(&p, "Email").as_deref(), Some("a@b.co"));
        assert_eq!(read_phone_number(&p, "Phone").as_deref(), Some("9876543210"));
        assert_eq!(read_number(&p, "Amount"), Some(49_999.0));
        assert_eq!(read_select(&p, "Status").as_deref(), Some("Completed"));
    }

    #[test]
    fn readers_handle_notion_responses() {
        let p = props(&[
            ("Villa", json!({"id": "title", "type": "title", "title": [
                {"type": "text", "plain_text": "Villa ", "text": {"content": "Villa "}},
                {"type": "text", "plain_text": "Azure", "text": {"content": "Azure"}}
            ]})),
            ("Razorpay Order ID", json!({"type": "rich_text", "rich_text": []})),
            ("Check In", json!({"type": "date", "date": {"start": "2025-01-10T14:00:00.000+05:30", "end": null}})),
            ("Email", json!({"type": "email", "email": null})),
            ("Status", json!({"type": "select", "select": null})),
        ]);
        assert_eq!(read_title(&p, "Villa").as_deref(), Some("Villa Azure"));
        assert_eq!(read_rich_text(&p, "Razorpay Order ID"), None);
        assert_eq!(read_date(&p, "Check In"), NaiveDate::from_ymd_opt(2025, 1, 10));
        assert_eq!(read_email(&p, "Email"), None);
        assert_eq!(read_select(&p, "Status"), None);
        assert_eq!(read_number(&p, "Nope"), None);
    }
}
