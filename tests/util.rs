//! Shared test utilities for integration tests
//!
//! Builds a small on-disk data directory with the three category datasets
//! (and optionally a Markdown articles tree) for driving the CLI.

use assert_fs::prelude::*;
use serde_json::json;

/// Write the three dataset files into a fresh temp directory.
pub fn make_data_fixture() -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    let spots = json!([
        {
            "id": "spot-001",
            "slug": "ushiyama-tunnel",
            "title": "旧丑山トンネル",
            "summary": "封鎖された旧道の坑口で足音が報告される。",
            "body": "本文",
            "tags": ["廃墟", "トンネル"],
            "publishedAt": "2026-01-12",
            "status": "published",
            "category": "spots",
            "pref": "群馬県",
            "type": "トンネル",
            "credibility": "B",
            "danger": 3
        },
        {
            "id": "spot-002",
            "slug": "kurotaki-hospital",
            "title": "黒滝病院跡",
            "summary": "取り壊し予定のまま放置された病棟。",
            "body": "本文",
            "tags": ["廃墟", "病院"],
            "publishedAt": "2026-01-20",
            "status": "published",
            "category": "spots",
            "pref": "群馬県",
            "type": "廃墟",
            "credibility": "A",
            "danger": 5
        },
        {
            "id": "spot-003",
            "slug": "mikage-lake",
            "title": "御影湖",
            "summary": "湖面に人影が立つという目撃談。",
            "body": "本文",
            "tags": ["湖", "目撃"],
            "publishedAt": "2026-02-02",
            "status": "published",
            "category": "spots",
            "pref": "栃木県",
            "type": "湖沼",
            "credibility": "C",
            "danger": 1
        },
        {
            "id": "spot-004",
            "slug": "draft-spot",
            "title": "未公開スポット",
            "summary": "下書き。",
            "body": "本文",
            "tags": ["廃墟"],
            "publishedAt": "2026-02-05",
            "status": "draft",
            "category": "spots",
            "pref": "群馬県",
            "type": "廃墟",
            "danger": 2
        }
    ]);

    let stories = json!([
        {
            "id": "story-001",
            "slug": "midnight-call",
            "title": "真夜中の着信",
            "summary": "非通知の着信に出ると自分の声がする。",
            "body": "本文",
            "tags": ["電話", "都市伝説"],
            "publishedAt": "2026-01-18",
            "status": "published",
            "category": "stories",
            "type": "都市伝説",
            "credibility": "B",
            "danger": 2
        }
    ]);

    let uma = json!([
        {
            "id": "uma-001",
            "slug": "kiriba-bird",
            "title": "霧羽の巨鳥",
            "summary": "山間に現れる巨大な黒い鳥影。",
            "body": "本文",
            "tags": ["飛行", "目撃"],
            "publishedAt": "2026-01-22",
            "status": "published",
            "category": "uma",
            "region": "東北",
            "type": "飛行型",
            "existence_rank": "S",
            "evidence_rank": "A",
            "danger": 4,
            "views": 900,
            "createdAt": "2026-01-20"
        },
        {
            "id": "uma-002",
            "slug": "numabe-serpent",
            "title": "沼辺の大蛇",
            "summary": "干拓地の水路で目撃される長大な影。",
            "body": "本文",
            "tags": ["水棲", "巨大生物"],
            "publishedAt": "2026-01-05",
            "status": "published",
            "category": "uma",
            "region": "関東",
            "type": "水棲型",
            "existence_rank": "D",
            "evidence_rank": "E",
            "danger": 1,
            "views": 12,
            "createdAt": "2025-11-20"
        }
    ]);

    tmp.child("spots.json")
        .write_str(&spots.to_string())
        .expect("write spots");
    tmp.child("stories.json")
        .write_str(&stories.to_string())
        .expect("write stories");
    tmp.child("uma.json")
        .write_str(&uma.to_string())
        .expect("write uma");

    tmp
}
