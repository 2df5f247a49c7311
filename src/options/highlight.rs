//! Hit highlighting.
//!
//! Scoping works as for faceting: settings given together with `fields`
//! become `f.<field>.hl.<name>` overrides, others are global `hl.<name>`.

use std::sync::Arc;

use ahash::AHashMap;
use lazy_static::lazy_static;

use crate::error::Result;
use crate::options::{
    FieldScoped, Kind, OptionFamily, Settings, check, field_list, unknown_setting,
};
use crate::params::{ParamMap, ParamValue};
use crate::schema::FieldRegistry;

lazy_static! {
    static ref HIGHLIGHT_SETTINGS: AHashMap<&'static str, Kind> = {
        let mut m = AHashMap::new();
        m.insert("snippets", Kind::Int);
        m.insert("fragsize", Kind::Int);
        m.insert("mergeContinuous", Kind::Bool);
        m.insert("requireFieldMatch", Kind::Bool);
        m.insert("maxAnalyzedChars", Kind::Int);
        m.insert("alternateField", Kind::Field);
        m.insert("maxAlternateFieldLength", Kind::Int);
        m.insert("formatter", Kind::Choice(&["simple"]));
        m.insert("simple.pre", Kind::Str);
        m.insert("simple.post", Kind::Str);
        m.insert("fragmenter", Kind::Choice(&["gap", "regex"]));
        m.insert("usePhraseHighlighter", Kind::Bool);
        m.insert("highlightMultiTerm", Kind::Bool);
        m.insert("regex.slop", Kind::Float);
        m.insert("regex.pattern", Kind::Pattern);
        m.insert("regex.maxAnalyzedChars", Kind::Int);
        m
    };
}

#[derive(Debug, Clone)]
pub struct HighlightOptions {
    registry: Arc<dyn FieldRegistry>,
    scoped: FieldScoped,
}

impl HighlightOptions {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        HighlightOptions {
            registry,
            scoped: FieldScoped::default(),
        }
    }
}

impl OptionFamily for HighlightOptions {
    const NAME: &'static str = "highlight";

    fn apply(&mut self, settings: Settings) -> Result<()> {
        settings.reject_query_fields(Self::NAME)?;
        let mut fields = Vec::new();
        let mut values = Vec::new();
        for (name, value) in settings.iter() {
            if name == "fields" {
                fields.extend(field_list(self.registry.as_ref(), value)?);
                continue;
            }
            let kind = HIGHLIGHT_SETTINGS
                .get(name)
                .ok_or_else(|| unknown_setting(Self::NAME, name))?;
            values.push((name.to_string(), check(self.registry.as_ref(), name, *kind, value)?));
        }
        self.scoped.apply(&fields, values);
        Ok(())
    }

    fn options(&self) -> ParamMap {
        let mut map = ParamMap::new();
        if self.scoped.is_empty() {
            return map;
        }
        map.insert("hl".into(), ParamValue::Bool(true));
        let fields = self.scoped.field_names();
        if !fields.is_empty() {
            map.insert("hl.fl".into(), ParamValue::Str(fields.join(",")));
        }
        self.scoped.emit("hl", &mut map);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::testing::registry;

    fn options(settings: Settings) -> Result<ParamMap> {
        let mut highlight = HighlightOptions::new(registry());
        highlight.update(settings)?;
        Ok(highlight.options())
    }

    fn expected(entries: Vec<(&str, ParamValue)>) -> ParamMap {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_fields() {
        assert_eq!(
            options(Settings::new().set("fields", "int_field")).unwrap(),
            expected(vec![("hl", true.into()), ("hl.fl", "int_field".into())])
        );
        assert_eq!(
            options(Settings::new().set("fields", vec!["int_field", "text_field"])).unwrap(),
            expected(vec![
                ("hl", true.into()),
                ("hl.fl", "int_field,text_field".into())
            ])
        );
    }

    #[test]
    fn test_all_knobs() {
        let settings = Settings::new()
            .set("snippets", 3)
            .set("fragsize", 5)
            .set("mergeContinuous", true)
            .set("requireFieldMatch", true)
            .set("maxAnalyzedChars", 500)
            .set("alternateField", "text_field")
            .set("maxAlternateFieldLength", 50)
            .set("formatter", "simple")
            .set("simple.pre", "<b>")
            .set("simple.post", "</b>")
            .set("fragmenter", "regex")
            .set("usePhraseHighlighter", true)
            .set("highlightMultiTerm", true)
            .set("regex.slop", 0.2)
            .set("regex.pattern", "\\w")
            .set("regex.maxAnalyzedChars", 100);
        assert_eq!(
            options(settings).unwrap(),
            expected(vec![
                ("hl", true.into()),
                ("hl.snippets", ParamValue::Int(3)),
                ("hl.fragsize", ParamValue::Int(5)),
                ("hl.mergeContinuous", true.into()),
                ("hl.requireFieldMatch", true.into()),
                ("hl.maxAnalyzedChars", ParamValue::Int(500)),
                ("hl.alternateField", "text_field".into()),
                ("hl.maxAlternateFieldLength", ParamValue::Int(50)),
                ("hl.formatter", "simple".into()),
                ("hl.simple.pre", "<b>".into()),
                ("hl.simple.post", "</b>".into()),
                ("hl.fragmenter", "regex".into()),
                ("hl.usePhraseHighlighter", true.into()),
                ("hl.highlightMultiTerm", true.into()),
                ("hl.regex.slop", ParamValue::Float(0.2)),
                ("hl.regex.pattern", "\\w".into()),
                ("hl.regex.maxAnalyzedChars", ParamValue::Int(100)),
            ])
        );
    }

    #[test]
    fn test_per_field_overrides() {
        assert_eq!(
            options(Settings::new().set("fields", "int_field").set("snippets", "3")).unwrap(),
            expected(vec![
                ("hl", true.into()),
                ("hl.fl", "int_field".into()),
                ("f.int_field.hl.snippets", ParamValue::Int(3)),
            ])
        );
        let settings = Settings::new()
            .set("fields", vec!["int_field", "text_field"])
            .set("snippets", 3)
            .set("fragsize", 5);
        assert_eq!(
            options(settings).unwrap(),
            expected(vec![
                ("hl", true.into()),
                ("hl.fl", "int_field,text_field".into()),
                ("f.int_field.hl.snippets", ParamValue::Int(3)),
                ("f.int_field.hl.fragsize", ParamValue::Int(5)),
                ("f.text_field.hl.snippets", ParamValue::Int(3)),
                ("f.text_field.hl.fragsize", ParamValue::Int(5)),
            ])
        );
    }

    #[test]
    fn test_bad_options() {
        for settings in [
            Settings::new().set("fields", "myarse"),
            Settings::new().set("oops", true),
            Settings::new().set("snippets", "a"),
            Settings::new().set("alternateField", "yourarse"),
            Settings::new().set("regex.pattern", "[unclosed"),
        ] {
            assert!(options(settings).unwrap_err().is_config());
        }
    }
}
