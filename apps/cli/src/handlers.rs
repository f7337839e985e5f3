use anyhow::Result;
use rosetta_translation::{
    COUNT, CachingTranslationMetricsProvider, JsonFileMetricsAdapter, Parameters, Translator,
};
use std::path::Path;
use std::sync::Arc;

pub(crate) fn warmup(translator: &mut Translator) -> Result<()> {
    let locales = translator.warm_up()?;
    if locales.is_empty() {
        println!("Translation cache is disabled, nothing to warm up");
    } else {
        println!("Warmed up {} locale(s): {}", locales.len(), locales.join(", "));
    }
    Ok(())
}

pub(crate) fn clear_cache(translator: &mut Translator) -> Result<()> {
    let cleared = translator.clear_cache()?;
    println!("Cleared {} compiled catalogue(s)", cleared.len());
    Ok(())
}

pub(crate) fn rebuild_cache(translator: &mut Translator) -> Result<()> {
    let moved = translator.rebuild_cache()?;
    println!("Rebuilt translation cache with {moved} compiled catalogue(s)");
    Ok(())
}

pub(crate) fn trans(
    translator: &mut Translator,
    id: &str,
    locale: Option<&str>,
    domain: Option<&str>,
    params: Vec<(String, String)>,
    count: Option<i64>,
) {
    let mut parameters: Parameters = params.into_iter().collect();
    if let Some(count) = count {
        parameters.insert(COUNT.to_owned(), count.to_string());
    }
    println!("{}", translator.trans(id, &parameters, domain, locale));
}

pub(crate) fn dump(translator: &mut Translator, locale: Option<&str>, domains: &[String]) -> Result<()> {
    let domains: Vec<&str> = domains.iter().map(String::as_str).collect();
    let translations = translator.get_translations(&domains, locale)?;
    println!("{}", serde_json::to_string_pretty(&translations)?);
    Ok(())
}

pub(crate) fn metrics(source: &Path, code: Option<&str>) {
    let provider = CachingTranslationMetricsProvider::new(Arc::new(JsonFileMetricsAdapter::new(source)));
    let metrics = match code {
        Some(code) => provider.get_for_language(code).into_iter().collect(),
        None => provider.get_all().into_values().collect::<Vec<_>>(),
    };
    for entry in metrics {
        let status = entry.translation_status.map_or_else(|| "-".to_owned(), |s| format!("{s}%"));
        let built = entry.last_build_date.map_or_else(|| "-".to_owned(), |d| d.to_rfc3339());
        println!("{}\t{status}\t{built}", entry.code);
    }
}
