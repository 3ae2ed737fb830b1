use assert_cmd::Command;
use predicates::prelude::*;

fn slotwise() -> Command {
    let mut cmd = Command::cargo_bin("slotwise").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    slotwise()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run").and(predicate::str::contains("regions")));
}

#[test]
fn unknown_region_is_rejected() {
    slotwise()
        .args(["run", "--region", "Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown GSP region code"));
}

#[test]
fn zero_hours_is_rejected() {
    slotwise()
        .args(["run", "--hours", "0"])
        .assert()
        .failure();
}

#[test]
fn regions_lists_every_area() {
    slotwise()
        .arg("regions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Southern England").and(predicate::str::contains("Northern Scotland")));
}

#[test]
fn mock_run_writes_csv() {
    slotwise()
        .args(["--mock", "run", "--hours", "6", "--format", "csv", "--tz", "utc"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "start,end,tariff_p_per_kwh,system_p_per_kwh,score\n",
        ));
}

#[test]
fn mock_run_renders_table_with_ranking() {
    slotwise()
        .args(["--mock", "run", "--hours", "12", "--top-k", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Best 4 slots"));
}

#[test]
fn mock_preference_run_includes_weather_columns() {
    slotwise()
        .args([
            "--mock", "run", "--mode", "preference", "--lat", "51.5", "--lon", "-0.12",
            "--format", "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("wind_speed_ms"));
}

#[test]
fn empty_upstream_suggests_retry() {
    slotwise()
        .args(["--mock", "run", "--product", "EMPTY"])
        .assert()
        .success()
        .stdout(predicate::str::contains("try again later"));
}

#[test]
fn upstream_failure_exits_nonzero() {
    slotwise()
        .args(["--mock", "run", "--product", "FAIL"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("forced failure"));
}
