use crate::models::mount::{StorageRow, Unit};
use crate::ui::theme::Theme;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// One output object. Size field names carry the unit: `total_gb`.
pub struct JsonRow<'a> {
    pub row:  &'a StorageRow,
    pub unit: Unit,
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let sfx = self.unit.suffix();
        let r = &self.row.record;
        let mut map = s.serialize_map(Some(8))?;
        map.serialize_entry("device", &r.device)?;
        map.serialize_entry("mountpoint", &r.mountpoint)?;
        map.serialize_entry(&format!("total_{}", sfx), &self.row.total)?;
        map.serialize_entry(&format!("used_{}", sfx), &self.row.used)?;
        map.serialize_entry(&format!("free_{}", sfx), &self.row.free)?;
        map.serialize_entry("usage_percent", &r.usage_percent)?;
        map.serialize_entry("filesystem", &r.fs_type)?;
        map.serialize_entry("status", self.row.status.label())?;
        map.end()
    }
}

fn json_rows(rows: &[StorageRow], unit: Unit) -> Vec<JsonRow<'_>> {
    rows.iter().map(|row| JsonRow { row, unit }).collect()
}

/// Plain pretty-printed JSON array, two-space indent.
pub fn render_raw(rows: &[StorageRow], unit: Unit) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json_rows(rows, unit))
}

/// Pretty JSON with syntax highlighting when the theme is enabled.
pub fn render(rows: &[StorageRow], unit: Unit, theme: &Theme) -> serde_json::Result<String> {
    if !theme.enabled {
        return render_raw(rows, unit);
    }
    let value = serde_json::to_value(json_rows(rows, unit))?;
    let mut out = String::new();
    write_value(&mut out, &value, 0, theme)?;
    Ok(out)
}

fn write_value(out: &mut String, v: &Value, depth: usize, theme: &Theme) -> serde_json::Result<()> {
    match v {
        Value::Null | Value::Bool(_) => out.push_str(&theme.paint(theme.json_lit, &v.to_string())),
        Value::Number(n) => out.push_str(&theme.paint(theme.json_num, &n.to_string())),
        Value::String(_) => out.push_str(&theme.paint(theme.json_str, &serde_json::to_string(v)?)),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return Ok(());
            }
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                indent(out, depth + 1);
                write_value(out, item, depth + 1, theme)?;
                if i + 1 < items.len() { out.push(','); }
                out.push('\n');
            }
            indent(out, depth);
            out.push(']');
        }
        Value::Object(map) => {
            if map.is_empty() {
                out.push_str("{}");
                return Ok(());
            }
            out.push_str("{\n");
            for (i, (k, item)) in map.iter().enumerate() {
                indent(out, depth + 1);
                out.push_str(&theme.paint(theme.json_key, &serde_json::to_string(k)?));
                out.push_str(": ");
                write_value(out, item, depth + 1, theme)?;
                if i + 1 < map.len() { out.push(','); }
                out.push('\n');
            }
            indent(out, depth);
            out.push('}');
        }
    }
    Ok(())
}

fn indent(out: &mut String, depth: usize) {
    out.push_str(&"  ".repeat(depth));
}
