use proptest::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tsq::{Catalog, CatalogError, Context, Message, TranslationStatus, Translator};

fn fixture_translator() -> Translator {
    let mut translator = Translator::new();
    translator
        .load(Path::new("tests/fixtures/ts/erebus"), "fr_FR")
        .unwrap();
    translator
}

#[test]
fn test_load_by_locale() {
    let translator = fixture_translator();
    assert_eq!(translator.catalogs().len(), 1);
    assert_eq!(
        translator.tr("CampaignWindow", "Continue your Quest"),
        "Continuer votre quête"
    );
}

#[test]
fn test_load_missing_locale() {
    let mut translator = Translator::new();
    let err = translator
        .load(Path::new("tests/fixtures/ts/erebus"), "ja_JP")
        .unwrap_err();
    assert!(matches!(err, CatalogError::CatalogNotFound { .. }));
    assert!(translator.is_empty());
}

#[test]
fn test_load_malformed_catalog() {
    let mut translator = Translator::new();
    let err = translator
        .load(Path::new("tests/fixtures/broken/erebus"), "de")
        .unwrap_err();
    assert!(matches!(err, CatalogError::Parse { .. }));
}

#[test]
fn test_later_catalog_wins() {
    let mut translator = fixture_translator();
    let patch = Catalog::from_contexts(
        "patch.ts",
        vec![Context::new("OptionsGamestate")
            .with_message(Message::new("Quit game").with_translation("Fermer"))],
    );
    translator.install(patch);
    assert_eq!(translator.tr("OptionsGamestate", "Quit game"), "Fermer");

    assert!(translator.remove(Path::new("patch.ts")));
    assert_eq!(translator.tr("OptionsGamestate", "Quit game"), "Quitter");
}

#[test]
fn test_obsolete_entries_are_not_served() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("app_it.ts"),
        r#"<TS version="2.1" language="it_IT">
<context><name>Main</name>
<message><source>Open</source><translation type="obsolete">Apri</translation></message>
<message><source>Save</source><translation type="vanished">Salva</translation></message>
</context></TS>"#,
    )
    .unwrap();

    let mut translator = Translator::new();
    let catalog = translator.load(&dir.path().join("app"), "it").unwrap();
    assert_eq!(
        catalog.find("Main", "Open", None).map(|m| m.status),
        Some(TranslationStatus::Obsolete)
    );
    assert_eq!(translator.tr("Main", "Open"), "Open");
    assert_eq!(translator.tr("Main", "Save"), "Save");
}

#[test]
fn test_plural_lookup_uses_language_rule() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("app_fr.ts"),
        r#"<TS version="2.1" language="fr">
<context><name>Shop</name>
<message numerus="yes"><source>%n item(s)</source>
<translation><numerusform>%n objet</numerusform><numerusform>%n objets</numerusform></translation>
</message></context></TS>"#,
    )
    .unwrap();

    let mut translator = Translator::new();
    translator.load(&dir.path().join("app"), "fr_FR").unwrap();
    assert_eq!(translator.tr_plural("Shop", "%n item(s)", None, 0), "0 objet");
    assert_eq!(translator.tr_plural("Shop", "%n item(s)", None, 1), "1 objet");
    assert_eq!(translator.tr_plural("Shop", "%n item(s)", None, 2), "2 objets");
    assert_eq!(translator.tr_plural("Shop", "%n other", None, 4), "4 other");
}

proptest! {
    #[test]
    fn lookup_in_unknown_context_returns_source(source in "[a-zA-Z0-9 %.,!?]{0,40}") {
        let translator = fixture_translator();
        let translated = translator.tr("NoSuchContext", &source);
        prop_assert_eq!(translated.as_ref(), source.as_str());
    }

    #[test]
    fn empty_translator_returns_source(context in "[A-Za-z]{1,12}", source in ".{0,30}") {
        let translator = Translator::new();
        let translated = translator.tr(&context, &source);
        prop_assert_eq!(translated.as_ref(), source.as_str());
    }
}
