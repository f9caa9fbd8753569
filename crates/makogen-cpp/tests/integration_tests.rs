//! Integration tests for the C++ lister

use makogen_api::{
    render, DeclarationSummary, ListerConfig, ListerError, MemberLister, OutputFormat,
};
use makogen_cpp::CppLister;
use std::fs;
use std::path::{Path, PathBuf};

const LOCATION_HPP: &str = include_str!("fixtures/odb/Location.hpp");
const PLAYER_HPP: &str = include_str!("fixtures/odb/Player.hpp");

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/odb")
}

fn render_text(summaries: &[DeclarationSummary]) -> String {
    let mut out = Vec::new();
    render(summaries, OutputFormat::Text, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_two_public_fields_one_private() {
    let lister = CppLister::new();

    let result = lister.list_source(LOCATION_HPP, Path::new("Location.hpp"));
    assert!(
        result.is_ok(),
        "Failed to list Location.hpp: {:?}",
        result.err()
    );

    assert_eq!(render_text(&result.unwrap()), "Location: x,y\n");
}

#[test]
fn test_player_header() {
    let lister = CppLister::new();
    let summaries = lister
        .list_source(PLAYER_HPP, Path::new("Player.hpp"))
        .unwrap();

    assert_eq!(
        render_text(&summaries),
        "Player: Player,id,username,password\nPlayerCount: count\n"
    );
}

#[test]
fn test_player_header_server_build() {
    let config = ListerConfig::default().with_define("PLAYPG_BUILD_SERVER");
    let lister = CppLister::with_config(config);
    let summaries = lister
        .list_source(PLAYER_HPP, Path::new("Player.hpp"))
        .unwrap();

    assert_eq!(
        summaries[0].public_members,
        vec!["Player", "id", "username", "password", "lastLogin"]
    );
}

#[test]
fn test_forward_declaration_and_export_macro() {
    let source = r#"
#include "PlayPGExport.hpp"

namespace PlayPG {
class Map;

class PLAYPG_EXPORT MovementSystem {
public:
    explicit MovementSystem(Map *map_);
    void update(float delta);

private:
    Map *map;
};
}
"#;
    let lister = CppLister::new();
    let summaries = lister
        .list_source(source, Path::new("MovementSystem.hpp"))
        .unwrap();

    assert_eq!(
        render_text(&summaries),
        "Map: \nMovementSystem: MovementSystem,update\n"
    );
}

#[test]
fn test_list_single_file() {
    let lister = CppLister::new();
    let summaries = lister
        .list_public_members(&fixtures_dir().join("Race.hpp"))
        .unwrap();

    assert_eq!(
        summaries,
        vec![DeclarationSummary::new("Race")
            .with_member("name")
            .with_member("description")
            .with_member("getName")]
    );
}

#[test]
fn test_list_directory_in_file_order() {
    let lister = CppLister::new();
    let summaries = lister.list_public_members(&fixtures_dir()).unwrap();

    let names: Vec<_> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Location", "Player", "PlayerCount", "Race"]);
}

#[test]
fn test_list_directory_json() {
    let lister = CppLister::new();
    let summaries = lister.list_public_members(&fixtures_dir()).unwrap();

    let mut out = Vec::new();
    render(&summaries, OutputFormat::Json, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(value.as_array().unwrap().len(), 4);
    assert_eq!(value[0]["name"], "Location");
    assert_eq!(value[0]["public_members"], serde_json::json!(["x", "y"]));
}

#[test]
fn test_missing_path_aborts() {
    let lister = CppLister::new();
    let missing = fixtures_dir().join("DoesNotExist.hpp");

    let result = lister.list_public_members(&missing);
    assert!(matches!(result, Err(ListerError::Io(_, _))));
}

#[test]
fn test_strict_mode_aborts_on_first_broken_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = "namespace PlayPG { struct A { int a; }; }";
    let bad = "namespace PlayPG { struct B { int b; ";
    fs::write(dir.path().join("a_good.hpp"), good).unwrap();
    fs::write(dir.path().join("b_bad.hpp"), bad).unwrap();

    let lenient = CppLister::new();
    let summaries = lenient.list_public_members(dir.path()).unwrap();
    assert_eq!(summaries[0].to_string(), "A: a");

    let strict = CppLister::with_config(ListerConfig::default().with_strict(true));
    let result = strict.list_public_members(dir.path());
    match result {
        Err(ListerError::SyntaxError(path, ..)) => {
            assert_eq!(path.file_name().unwrap(), "b_bad.hpp");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_file_size_limit() {
    let lister = CppLister::with_config(ListerConfig::default().with_max_file_size(32));
    let result = lister.list_public_members(&fixtures_dir().join("Player.hpp"));

    assert!(matches!(result, Err(ListerError::FileTooLarge(_, 32))));
}

#[test]
fn test_lister_language_name() {
    let lister = CppLister::new();
    assert_eq!(lister.language(), "cpp");
    assert_eq!(lister.config().namespace, "PlayPG");
}
