use assert_cmd::Command;

#[test]
fn help_lists_every_directory_command() {
    let mut cmd = Command::cargo_bin("rosterctl").expect("binary builds");
    let output = cmd
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    for command in ["login", "logout", "list", "create", "update", "delete"] {
        assert!(text.contains(command), "help missing `{command}`");
    }
}

#[test]
fn list_documents_pagination_and_search_flags() {
    let mut cmd = Command::cargo_bin("rosterctl").expect("binary builds");
    let output = cmd
        .arg("list")
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("--page"), "list help missing --page");
    assert!(text.contains("--query"), "list help missing --query");
}

#[test]
fn create_requires_the_user_fields() {
    let mut cmd = Command::cargo_bin("rosterctl").expect("binary builds");
    let output = cmd
        .arg("create")
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("--email"), "create help missing --email");
    assert!(
        text.contains("--first-name"),
        "create help missing --first-name"
    );
}
