use assert_cmd::{cargo_bin, Command};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/ts/erebus_fr.ts";

fn tsq() -> Command {
    Command::new(cargo_bin!("tsq"))
}

#[test]
fn test_help_flag() {
    tsq()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Qt Linguist"))
        .stdout(predicate::str::contains("USAGE:"));
}

#[test]
fn test_version_flag() {
    tsq()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_requires_subcommand() {
    tsq().assert().failure();
}

#[test]
fn test_lookup_translated() {
    tsq()
        .args(["lookup", FIXTURE, "OptionsGamestate", "Quit game"])
        .assert()
        .success()
        .stdout("Quitter\n");
}

#[test]
fn test_lookup_with_comment() {
    tsq()
        .args(["lookup", FIXTURE, "ItemsWindow", "Arm", "--comment", "Armour"])
        .assert()
        .success()
        .stdout("Armures\n");
}

#[test]
fn test_lookup_falls_back_to_source() {
    tsq()
        .args(["lookup", FIXTURE, "LevelUpWindow", "Ranged combat"])
        .assert()
        .success()
        .stdout("Ranged combat\n");
}

#[test]
fn test_lookup_plural_fallback_substitutes_count() {
    tsq()
        .args(["lookup", FIXTURE, "TradeWindow", "%n gold", "--count", "3"])
        .assert()
        .success()
        .stdout("3 gold\n");
}

#[test]
fn test_lookup_malformed_catalog_fails() {
    tsq()
        .args(["lookup", "tests/fixtures/broken/erebus_de.ts", "C", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse catalog"));
}

#[test]
fn test_empty_search_text_fails() {
    tsq()
        .args(["search", "", "tests/fixtures/ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("search text cannot be empty"));
}

#[test]
fn test_search_simple_output() {
    tsq()
        .args(["search", "Start next Quest", "tests/fixtures/ts", "--simple"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "erebus_fr.ts:1676:CampaignWindow: Start next Quest => Démarrer quête suivante",
        ));
}

#[test]
fn test_search_translation_only() {
    tsq()
        .args([
            "search",
            "Quitter",
            "tests/fixtures/ts",
            "--translation-only",
            "--simple",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("OptionsGamestate: Quit game => Quitter"))
        .stdout(predicate::str::contains("PlayingGamestate: Quit game => Quitter"));
}

#[test]
fn test_search_tree_output() {
    tsq()
        .env("NO_COLOR", "1")
        .args(["search", "Pick Up", "tests/fixtures/ts", "--case-sensitive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog:"))
        .stdout(predicate::str::contains("Context: ItemsPickerWindow"));
}

#[test]
fn test_search_json_output() {
    tsq()
        .args(["search", "Drop", "tests/fixtures/ts", "--word", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"query\": \"Drop\""))
        .stdout(predicate::str::contains("\"catalogs_searched\": 1"));
}

#[test]
fn test_search_no_matches() {
    let dir = TempDir::new().unwrap();
    tsq()
        .args(["search", "nonexistent text"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found"));
}

#[test]
fn test_search_skips_broken_catalogs() {
    tsq()
        .args(["search", "Quit", "tests/fixtures/broken"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found"));
}

#[test]
fn test_check_clean_catalog() {
    tsq()
        .args(["check", "tests/fixtures/ts", "--structural"])
        .assert()
        .success()
        .stderr(predicate::str::contains("0 error(s), 0 warning(s)"));
}

#[test]
fn test_check_reports_errors() {
    tsq()
        .args(["check", "tests/fixtures/invalid"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("negative location line -7"))
        .stdout(predicate::str::contains("finished message has no translation"))
        .stdout(predicate::str::contains("missing %1"))
        .stderr(predicate::str::contains("2 error(s), 1 warning(s)"));
}

#[test]
fn test_check_malformed_catalog_fails() {
    tsq()
        .args(["check", "tests/fixtures/broken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("erebus_de.ts"));
}

#[test]
fn test_stats() {
    tsq()
        .args(["stats", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("(fr_FR): 116/224 finished"))
        .stdout(predicate::str::contains("TradeWindow"));
}

#[test]
fn test_stats_json() {
    tsq()
        .args(["stats", FIXTURE, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"unfinished\": 108"));
}

#[test]
fn test_export_ts_round_trips() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("erebus_fr.ts");
    tsq()
        .args(["export", FIXTURE, "--format", "ts", "--output"])
        .arg(&out)
        .assert()
        .success();

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("<TS version=\"2.0\" language=\"fr_FR\">"));

    tsq()
        .args(["lookup"])
        .arg(&out)
        .args(["CampaignWindow", "Continue your Quest"])
        .assert()
        .success()
        .stdout("Continuer votre quête\n");
}

#[test]
fn test_export_json() {
    tsq()
        .args(["export", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"language\": \"fr_FR\""))
        .stdout(predicate::str::contains("\"name\": \"CampaignWindow\""));
}

#[test]
fn test_tree_single_context() {
    tsq()
        .args(["tree", FIXTURE, "--context", "TradeWindow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Context: TradeWindow"))
        .stdout(predicate::str::contains("Context: ItemsWindow").not());
}

#[test]
fn test_resolve_falls_back_to_language() {
    tsq()
        .args(["resolve", "tests/fixtures/ts/erebus", "--locale", "fr_CA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("locale: fr_CA"))
        .stdout(predicate::str::contains("loads: tests/fixtures/ts/erebus_fr.ts"));
}

#[test]
fn test_resolve_missing_locale() {
    tsq()
        .args(["resolve", "tests/fixtures/ts/erebus", "--locale", "de"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No catalog found for locale 'de'"));
}

#[test]
fn test_resolve_uses_locale_override() {
    tsq()
        .env("TSQ_LOCALE", "fr-FR.UTF-8")
        .args(["resolve", "tests/fixtures/ts/erebus"])
        .assert()
        .success()
        .stdout(predicate::str::contains("locale: fr_FR"))
        .stdout(predicate::str::contains("loads: tests/fixtures/ts/erebus_fr.ts"));
}

#[test]
fn test_resolve_explicit_locale_beats_override() {
    tsq()
        .env("TSQ_LOCALE", "fr_FR")
        .args(["resolve", "tests/fixtures/ts/erebus", "--locale", "de"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No catalog found for locale 'de'"));
}

const PLURAL_CATALOG: &str = r#"<TS version="2.1" language="fr">
<context><name>TradeWindow</name>
<message numerus="yes"><source>%n gold</source>
<translation><numerusform>%n pièce d'or</numerusform><numerusform>%n pièces d'or</numerusform></translation>
</message></context></TS>"#;

#[test]
fn test_lookup_plural_requires_count() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shop_fr.ts");
    fs::write(&path, PLURAL_CATALOG).unwrap();

    tsq()
        .arg("lookup")
        .arg(&path)
        .args(["TradeWindow", "%n gold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass --count"));

    tsq()
        .arg("lookup")
        .arg(&path)
        .args(["TradeWindow", "%n gold", "--count", "3"])
        .assert()
        .success()
        .stdout("3 pièces d'or\n");
}
