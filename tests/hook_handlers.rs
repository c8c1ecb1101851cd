//! End-to-end scenarios from the enforcement-engine design: drives the
//! compiled `bumper` binary exactly as the host dispatcher would, one JSON
//! request on stdin per subcommand.

mod common;

use common::TestRepo;

fn set_threshold(repo: &TestRepo, threshold: u32) {
    repo.write_file(
        ".bumper-lanes.json",
        &serde_json::json!({ "threshold": threshold }).to_string(),
    );
}

fn start_session(repo: &TestRepo, session_id: &str) {
    let req = repo.session_request(session_id);
    let out = repo.run_hook("session-start", &req);
    assert_eq!(out.code, 0, "session-start stderr: {}", out.stderr);
}

#[test]
fn s1_clean_session_under_threshold_never_blocks() {
    let repo = TestRepo::init();
    repo.commit_all("initial");
    set_threshold(&repo, 400);
    start_session(&repo, "s1");

    repo.write_lines("a.txt", 100);
    let post = repo.run_hook("post-tool-use", &repo.tool_request("s1", "Write"));
    assert_eq!(post.code, 0, "no tier warning expected under threshold");

    let stop = repo.run_hook("stop", &repo.stop_request("s1", false));
    assert!(stop.stdout.trim().is_empty(), "stop must not block: {}", stop.stdout);
}

#[test]
fn s2_trip_then_reset_clears_the_gate() {
    let repo = TestRepo::init();
    repo.commit_all("initial");
    set_threshold(&repo, 200);
    start_session(&repo, "s2");

    repo.write_lines("a.txt", 100);
    repo.write_lines("b.txt", 100);
    repo.write_lines("c.txt", 100);
    repo.run_hook("post-tool-use", &repo.tool_request("s2", "Write"));

    let stop = repo.run_hook("stop", &repo.stop_request("s2", false));
    assert!(stop.stdout.contains("300/200"), "stdout: {}", stop.stdout);
    assert!(stop.stdout.contains("150%"), "stdout: {}", stop.stdout);
    assert!(stop.stdout.contains("\"decision\":\"block\""));

    let deny = repo.run_hook("pre-tool-use", &repo.tool_request("s2", "Write"));
    assert!(deny.stdout.contains("\"permissionDecision\":\"deny\""));

    let reset = repo.run_hook("prompt-submit", &repo.prompt_request("s2", "/bumper-reset"));
    assert!(reset.stdout.contains("\"decision\":\"block\""));

    let allow = repo.run_hook("pre-tool-use", &repo.tool_request("s2", "Write"));
    assert!(allow.stdout.trim().is_empty(), "gate should be clear after reset");
}

#[test]
fn s3_trip_then_external_commit_unblocks_next_edit() {
    let repo = TestRepo::init();
    repo.commit_all("initial");
    set_threshold(&repo, 100);
    start_session(&repo, "s3");

    repo.write_lines("big.txt", 200);
    repo.run_hook("post-tool-use", &repo.tool_request("s3", "Write"));
    repo.run_hook("stop", &repo.stop_request("s3", false));

    // User commits externally, outside the assistant's tool calls.
    repo.commit_all("checkpoint");

    let allow = repo.run_hook("pre-tool-use", &repo.tool_request("s3", "Write"));
    assert!(
        allow.stdout.trim().is_empty(),
        "pre-edit gate must allow after external commit: {}",
        allow.stdout
    );
}

#[test]
fn s4_delete_recreate_bypass_is_blocked() {
    // Recreated content differs from the committed original so the final
    // tree is not bit-identical to the baseline tree — git trees are
    // content-addressed, so a byte-for-byte-identical recreation is
    // indistinguishable from "nothing happened" at the tree-diff level no
    // matter how the scorer is implemented (see DESIGN.md). Since scoring is
    // always fresh-from-baseline, the intermediate delete never appears in
    // the diff at all: big.txt existed at this path in the baseline tree, so
    // the recreated file is scored as an edit of existing content (1.3x),
    // not a deletion netted against a new addition. Either weighting trips
    // the threshold below; the point being tested is that the delete step
    // bought the assistant nothing.
    let repo = TestRepo::init();
    let original: String = (0..450).map(|i| format!("line {i}\n")).collect();
    let recreated: String = (0..450).map(|i| format!("line {i}!\n")).collect();
    repo.write_file("big.txt", &original);
    repo.commit_all("add big.txt");
    set_threshold(&repo, 300);
    start_session(&repo, "s4");

    std::fs::remove_file(repo.path().join("big.txt")).unwrap();
    let after_delete = repo.run_hook("post-tool-use", &repo.tool_request("s4", "Write"));
    assert_eq!(after_delete.code, 0, "pure deletion must not warn");

    repo.write_file("big.txt", &recreated);
    repo.run_hook("post-tool-use", &repo.tool_request("s4", "Write"));

    let stop = repo.run_hook("stop", &repo.stop_request("s4", false));
    assert!(
        stop.stdout.contains("\"decision\":\"block\""),
        "deleting a file must not let its recreation escape scoring: {}",
        stop.stdout
    );
}

#[test]
fn s5_scatter_across_many_files() {
    let repo = TestRepo::init();
    repo.commit_all("initial");
    set_threshold(&repo, 500);
    start_session(&repo, "s5");

    for i in 0..12 {
        repo.write_lines(&format!("f{i}.txt"), 10);
    }
    repo.run_hook("post-tool-use", &repo.tool_request("s5", "Write"));

    let stop = repo.run_hook("stop", &repo.stop_request("s5", false));
    assert!(stop.stdout.trim().is_empty(), "330 < 500 must not block: {}", stop.stdout);
}

#[test]
fn s6_paused_session_never_blocks() {
    let repo = TestRepo::init();
    repo.commit_all("initial");
    set_threshold(&repo, 50);
    start_session(&repo, "s6");

    repo.run_hook("prompt-submit", &repo.prompt_request("s6", "/bumper-pause"));
    repo.write_lines("big.txt", 500);
    repo.run_hook("post-tool-use", &repo.tool_request("s6", "Write"));

    let stop = repo.run_hook("stop", &repo.stop_request("s6", false));
    assert!(stop.stdout.trim().is_empty(), "paused session must never block: {}", stop.stdout);
}

#[test]
fn fails_open_on_missing_session_record() {
    let repo = TestRepo::init();
    repo.commit_all("initial");
    // No session-start call: no record exists for this id.
    let deny = repo.run_hook("pre-tool-use", &repo.tool_request("ghost", "Write"));
    assert!(deny.stdout.trim().is_empty());
    let stop = repo.run_hook("stop", &repo.stop_request("ghost", false));
    assert!(stop.stdout.trim().is_empty());
}

#[test]
fn slash_command_substring_is_not_triggered() {
    let repo = TestRepo::init();
    repo.commit_all("initial");
    set_threshold(&repo, 200);
    start_session(&repo, "s11");

    let out = repo.run_hook(
        "prompt-submit",
        &repo.prompt_request("s11", "please run /bumper-reset now"),
    );
    assert!(out.stdout.trim().is_empty(), "substring must not trigger: {}", out.stdout);
}

#[test]
fn disabled_threshold_never_warns_or_blocks() {
    let repo = TestRepo::init();
    repo.commit_all("initial");
    set_threshold(&repo, 0);
    start_session(&repo, "s10");

    repo.write_lines("huge.txt", 10_000);
    let post = repo.run_hook("post-tool-use", &repo.tool_request("s10", "Write"));
    assert_eq!(post.code, 0, "disabled threshold must emit no warning");

    let stop = repo.run_hook("stop", &repo.stop_request("s10", false));
    assert!(stop.stdout.trim().is_empty());
}
