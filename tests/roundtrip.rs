use std::fs;
use std::path::Path;

use alloy_primitives::U256;
use reward_tally::ToolError;
use reward_tally::model::{Category, CategoryTiers, DisplayTable, OnchainTable, Partition, Tier};
use reward_tally::run::{RunConfig, run};
use reward_tally::sources::SourceTable;
use reward_tally::validate::validate_address;
use tempfile::tempdir;

const ALICE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const BOB: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
const CAROL: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";
const HEADER: &str = "user,tvl_tier,prize";

/// Writes an export for every slot, using `rows_for` to fill it.
fn write_exports(dir: &Path, rows_for: impl Fn(Partition, Category) -> Vec<String>) -> SourceTable {
    let sources = SourceTable::from_directory(dir, "0424");
    for (partition, category, path) in sources.iter() {
        let mut contents = vec![HEADER.to_string()];
        contents.extend(rows_for(partition, category));
        fs::write(path, contents.join("\n")).expect("export written");
    }
    sources
}

fn config(dir: &Path, sources: SourceTable) -> RunConfig {
    RunConfig {
        sources,
        token_price_usd: 2.609,
        onchain_output: dir.join("forSC.json"),
        display_output: dir.join("forFE.json"),
    }
}

fn sample_rows(partition: Partition, category: Category) -> Vec<String> {
    match (partition, category) {
        (Partition::Part1, Category::Btcb) => vec![
            format!("{},tier2-gold,100", ALICE.to_lowercase()),
            format!("{BOB},tier1,250"),
        ],
        (Partition::Part1, Category::Eth) => vec![format!("{ALICE},tier4,100")],
        (Partition::Part2, Category::Usdt) => vec![
            format!("{BOB},tier3-silver,100"),
            format!("{CAROL},tier1-tier2,250"),
        ],
        _ => Vec::new(),
    }
}

fn amount(raw: &str) -> U256 {
    U256::from_str_radix(raw, 10).expect("decimal literal")
}

#[test]
fn export_file_names_follow_round_layout() {
    let sources = SourceTable::from_directory(Path::new("csvs"), "0424");

    assert_eq!(
        sources.path(Partition::Part1, Category::Btcb),
        Path::new("csvs/btcb_wbnb_p1_p_0424.csv")
    );
    assert_eq!(
        sources.path(Partition::Part2, Category::Usdt),
        Path::new("csvs/usdt_wbnb_p2_p_0424.csv")
    );

    let order: Vec<(Partition, Category)> = sources
        .iter()
        .map(|(partition, category, _)| (partition, category))
        .collect();
    assert_eq!(order.len(), 8);
    assert!(order[..4].iter().all(|(partition, _)| *partition == Partition::Part1));
    assert!(order[4..].iter().all(|(partition, _)| *partition == Partition::Part2));
    assert_eq!(order[0].1, Category::Btcb);
    assert_eq!(order[3].1, Category::Usdt);
}

#[test]
fn run_aggregates_all_exports_into_both_artifacts() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = write_exports(temp_dir.path(), sample_rows);
    let config = config(temp_dir.path(), sources);

    let summary = run(&config).expect("run succeeds");
    assert_eq!(summary.row_count, 5);
    assert_eq!(summary.address_count, 3);

    let onchain: OnchainTable =
        serde_json::from_str(&fs::read_to_string(&config.onchain_output).expect("SC read"))
            .expect("SC parsed");
    let display: DisplayTable =
        serde_json::from_str(&fs::read_to_string(&config.display_output).expect("FE read"))
            .expect("FE parsed");

    let alice = validate_address(ALICE).expect("alice");
    let bob = validate_address(BOB).expect("bob");
    let carol = validate_address(CAROL).expect("carol");

    // Two rows of 100 USD at 2.609.
    assert_eq!(
        onchain[&alice].cumulative_reward_amount,
        amount("76657723265619012000")
    );
    assert!(onchain[&alice].eligible_partition1);
    assert!(!onchain[&alice].eligible_partition2);
    assert_eq!(display[&alice].part1.btcb, Some(Tier::T2));
    assert_eq!(display[&alice].part1.eth, Some(Tier::T4));
    assert_eq!(display[&alice].part2, CategoryTiers::default());

    assert!(onchain[&bob].eligible_partition1);
    assert!(onchain[&bob].eligible_partition2);
    assert_eq!(display[&bob].part1.btcb, Some(Tier::T1));
    assert_eq!(display[&bob].part2.usdt, Some(Tier::T3));

    assert!(!onchain[&carol].eligible_partition1);
    assert!(onchain[&carol].eligible_partition2);
    assert_eq!(display[&carol].part2.usdt, Some(Tier::T1));

    let sum = onchain
        .values()
        .fold(U256::ZERO, |total, entry| total + entry.cumulative_reward_amount);
    assert_eq!(summary.total_reward_amount, sum);
    assert_eq!(summary.total_tokens(), "306.630893062476038");
}

#[test]
fn artifacts_use_decimal_strings_and_null_slots() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = write_exports(temp_dir.path(), |partition, category| {
        if (partition, category) == (Partition::Part1, Category::Busd) {
            vec![format!("{ALICE},tier2-gold,100")]
        } else {
            Vec::new()
        }
    });
    let config = config(temp_dir.path(), sources);
    run(&config).expect("run succeeds");

    let onchain: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.onchain_output).expect("SC read"))
            .expect("SC parsed");
    assert_eq!(
        onchain,
        serde_json::json!({
            ALICE: {
                "cumulative_reward_amount": "38328861632809506000",
                "eligible_partition1": true,
                "eligible_partition2": false
            }
        })
    );

    let display: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.display_output).expect("FE read"))
            .expect("FE parsed");
    assert_eq!(
        display,
        serde_json::json!({
            ALICE: {
                "part1": {"btcb": null, "busd": "t2", "eth": null, "usdt": null},
                "part2": {"btcb": null, "busd": null, "eth": null, "usdt": null}
            }
        })
    );
}

#[test]
fn reserialized_artifacts_are_identical() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = write_exports(temp_dir.path(), sample_rows);
    let config = config(temp_dir.path(), sources);
    run(&config).expect("run succeeds");

    let onchain_text = fs::read_to_string(&config.onchain_output).expect("SC read");
    let onchain: OnchainTable = serde_json::from_str(&onchain_text).expect("SC parsed");
    assert_eq!(
        serde_json::to_string_pretty(&onchain).expect("SC serialized"),
        onchain_text
    );

    let display_text = fs::read_to_string(&config.display_output).expect("FE read");
    let display: DisplayTable = serde_json::from_str(&display_text).expect("FE parsed");
    assert_eq!(
        serde_json::to_string_pretty(&display).expect("FE serialized"),
        display_text
    );
}

#[test]
fn extra_columns_are_ignored() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = SourceTable::from_directory(temp_dir.path(), "0424");
    for (partition, category, path) in sources.iter() {
        let mut contents = String::from("rank,user,tvl,tvl_tier,prize\n");
        if (partition, category) == (Partition::Part2, Category::Eth) {
            contents.push_str(&format!("1,{BOB},1234.5,tier3,10\n"));
        }
        fs::write(path, contents).expect("export written");
    }
    let config = config(temp_dir.path(), sources);

    let summary = run(&config).expect("run succeeds");
    assert_eq!(summary.row_count, 1);
    assert_eq!(summary.address_count, 1);
}

#[test]
fn invalid_address_aborts_without_writing_artifacts() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = write_exports(temp_dir.path(), |partition, category| {
        let mut rows = sample_rows(partition, category);
        if (partition, category) == (Partition::Part2, Category::Btcb) {
            rows.push("not-an-address,tier1,10".to_string());
        }
        rows
    });
    let config = config(temp_dir.path(), sources);

    let error = run(&config).expect_err("run aborts");
    assert!(matches!(error, ToolError::InvalidAddress(value) if value == "not-an-address"));
    assert!(!config.onchain_output.exists());
    assert!(!config.display_output.exists());
}

#[test]
fn duplicate_row_aborts_without_writing_artifacts() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = write_exports(temp_dir.path(), |partition, category| {
        if (partition, category) == (Partition::Part1, Category::Eth) {
            vec![format!("{CAROL},tier1,10"), format!("{CAROL},tier2,20")]
        } else {
            Vec::new()
        }
    });
    let config = config(temp_dir.path(), sources);

    let error = run(&config).expect_err("run aborts");
    assert!(matches!(error, ToolError::DuplicateRecord { .. }));
    assert_eq!(error.to_string(), format!("duplicate user: {CAROL} in eth, p1"));
    assert!(!config.onchain_output.exists());
    assert!(!config.display_output.exists());
}

#[test]
fn missing_export_is_fatal() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = write_exports(temp_dir.path(), sample_rows);
    let missing = sources.path(Partition::Part2, Category::Busd).to_path_buf();
    fs::remove_file(&missing).expect("export removed");
    let config = config(temp_dir.path(), sources);

    match run(&config) {
        Err(ToolError::UnreadableInput { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected UnreadableInput, got {other:?}"),
    }
    assert!(!config.onchain_output.exists());
}

#[test]
fn export_without_contractual_header_is_fatal() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = write_exports(temp_dir.path(), |_, _| Vec::new());
    let broken = sources.path(Partition::Part1, Category::Usdt).to_path_buf();
    fs::write(&broken, format!("user,tier,prize\n{ALICE},tier1,10\n")).expect("export written");
    let config = config(temp_dir.path(), sources);

    assert!(matches!(
        run(&config),
        Err(ToolError::UnreadableInput { path, .. }) if path == broken
    ));
}

#[test]
fn non_positive_price_is_rejected_before_reading() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = SourceTable::from_directory(temp_dir.path(), "0424");
    let mut config = config(temp_dir.path(), sources);
    config.token_price_usd = 0.0;

    assert!(matches!(run(&config), Err(ToolError::InvalidPrice(_))));
}

#[test]
fn failed_display_write_leaves_no_artifact_behind() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = write_exports(temp_dir.path(), sample_rows);
    let mut config = config(temp_dir.path(), sources);
    config.display_output = temp_dir.path().join("missing").join("forFE.json");

    match run(&config) {
        Err(ToolError::WriteFailure { path, .. }) => assert_eq!(path, config.display_output),
        other => panic!("expected WriteFailure, got {other:?}"),
    }
    assert!(!config.onchain_output.exists());
    assert!(!config.display_output.exists());

    let leftovers: Vec<String> = fs::read_dir(temp_dir.path())
        .expect("directory listed")
        .map(|entry| entry.expect("directory entry").file_name().to_string_lossy().into_owned())
        .filter(|name| !name.ends_with(".csv"))
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[test]
fn rerun_replaces_existing_artifacts() {
    let temp_dir = tempdir().expect("temporary directory");
    let sources = write_exports(temp_dir.path(), sample_rows);
    let config = config(temp_dir.path(), sources);
    fs::write(&config.onchain_output, "stale").expect("stale artifact written");

    run(&config).expect("run succeeds");

    let onchain: OnchainTable =
        serde_json::from_str(&fs::read_to_string(&config.onchain_output).expect("SC read"))
            .expect("SC parsed");
    assert_eq!(onchain.len(), 3);
}
