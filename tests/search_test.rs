mod common;

use assert2::{check, let_assert};
use common::{DocsWorkspace, PLAY_PATH, built_workspace};
use rstest::rstest;
use tgcalls_docs::search::{MarkupIndex, RankedSearch, RecordIndex};

fn records(docs: &DocsWorkspace) -> RecordIndex {
    RecordIndex::load(docs.snapshot_path()).expect("snapshot should load")
}

#[rstest]
fn title_match_ranks_first_then_shorter_titles(built_workspace: DocsWorkspace) {
    let index = records(&built_workspace);
    let titles: Vec<&str> = index
        .search("play", 10)
        .iter()
        .map(|record| record.title.as_str())
        .collect();

    // StreamMode scores on its PLAYBACK member; stop and pause tie on description.
    check!(titles == ["play", "StreamMode", "stop", "pause"]);
}

#[rstest]
fn query_is_case_insensitive_and_trimmed(built_workspace: DocsWorkspace) {
    let index = records(&built_workspace);
    let results = index.search("  PLAY ", 1);
    let_assert!([first, ..] = results.as_slice());
    check!(first.path == PLAY_PATH);
}

#[rstest]
#[case("")]
#[case("   \t")]
fn blank_queries_return_nothing(built_workspace: DocsWorkspace, #[case] query: &str) {
    check!(records(&built_workspace).search(query, 10).is_empty());
}

#[rstest]
fn limit_is_respected(built_workspace: DocsWorkspace) {
    check!(records(&built_workspace).search("play", 2).len() == 2);
}

#[rstest]
fn unknown_paths_get_suggestions(built_workspace: DocsWorkspace) {
    let index = records(&built_workspace);
    check!(index.get("PyTgCalls/Client/Stream Methods/play.xml").is_some());

    let suggestions = index.suggest("/PyTgCalls/Client/Stream Methods/plya.xml", 3);
    let_assert!(Some(best) = suggestions.first());
    check!(best.path == PLAY_PATH);
}

#[rstest]
fn markup_search_reads_the_page_map(built_workspace: DocsWorkspace) {
    let_assert!(Ok(markup) = MarkupIndex::load(&built_workspace.settings.sources.map));
    check!(markup.len() == 6);

    let hits = markup.search("play", 5);
    let_assert!(Some(first) = hits.first());
    check!(first.path == "PyTgCalls/Client/Stream Methods/play.xml");
    check!(first.score == 100);
    check!(hits.windows(2).all(|pair| pair[0].score >= pair[1].score));

    let_assert!(Some(overview) = markup.overview(PLAY_PATH));
    check!(overview.title == "play");
    check!(overview.examples == vec!["await app.play(chat_id)".to_string()]);
}
