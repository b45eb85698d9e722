//! The validation gate must collect every violation before failing.

mod util;

use std::process::Command;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn broken_records_are_all_reported_in_one_run()
{
    let tmp = util::make_data_fixture();

    // Replace the spots dataset with one carrying several distinct problems.
    let broken = json!([
        {
            "id": "spot-001",
            "slug": "Bad_Slug",
            "title": "",
            "summary": "概要",
            "body": "本文",
            "tags": ["未知タグ"],
            "publishedAt": "2026-13-40",
            "status": "published",
            "category": "spots",
            "danger": 9
        },
        {
            "id": "spot-002",
            "slug": "twin",
            "title": "一軒目",
            "summary": "概要",
            "body": "本文",
            "tags": ["廃墟"],
            "publishedAt": "2026-01-01",
            "status": "published",
            "category": "spots"
        },
        {
            "id": "spot-003",
            "slug": "twin",
            "title": "二軒目",
            "summary": "概要",
            "body": "本文",
            "tags": ["廃墟"],
            "publishedAt": "2026-01-02",
            "status": "published",
            "category": "spots"
        }
    ]);
    tmp.child("spots.json")
        .write_str(&broken.to_string())
        .expect("write spots");

    let assert = Command::cargo_bin("kdx")
        .expect("bin")
        .arg("validate")
        .arg("--data-dir")
        .arg(tmp.path())
        .assert()
        .failure();

    // Every category of problem appears in a single run.
    assert
        .stderr(predicate::str::contains("Bad_Slug"))
        .stderr(predicate::str::contains("`title`"))
        .stderr(predicate::str::contains("未知タグ"))
        .stderr(predicate::str::contains("2026-13-40"))
        .stderr(predicate::str::contains("danger"))
        .stderr(predicate::str::contains("duplicate slug"));
}

#[test]
fn malformed_json_record_is_one_violation_not_a_crash()
{
    let tmp = util::make_data_fixture();

    // Second element is missing required fields entirely.
    let mixed = json!([
        {
            "id": "spot-001",
            "slug": "fine-spot",
            "title": "正常な記録",
            "summary": "概要",
            "body": "本文",
            "tags": ["廃墟"],
            "publishedAt": "2026-01-01",
            "status": "published",
            "category": "spots"
        },
        { "slug": "half-a-record" }
    ]);
    tmp.child("spots.json")
        .write_str(&mixed.to_string())
        .expect("write spots");

    Command::cargo_bin("kdx")
        .expect("bin")
        .arg("validate")
        .arg("--data-dir")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("spots#1"))
        .stderr(predicate::str::contains("malformed"));
}

#[test]
fn uma_extension_fields_are_required()
{
    let tmp = util::make_data_fixture();

    let bare = json!([
        {
            "id": "uma-001",
            "slug": "bare-cryptid",
            "title": "素の未確認生物",
            "summary": "概要",
            "body": "本文",
            "tags": ["目撃"],
            "publishedAt": "2026-01-01",
            "status": "published",
            "category": "uma"
        }
    ]);
    tmp.child("uma.json")
        .write_str(&bare.to_string())
        .expect("write uma");

    Command::cargo_bin("kdx")
        .expect("bin")
        .arg("validate")
        .arg("--data-dir")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("`region`"))
        .stderr(predicate::str::contains("`existence_rank`"))
        .stderr(predicate::str::contains("`evidence_rank`"))
        .stderr(predicate::str::contains("`views`"));
}
