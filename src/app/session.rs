use crate::app::pipelines::{CipherPipeline, ClimatePipeline, TreePipeline};
use crate::config::toml_config::{CipherConfig, ClimateConfig, TreeConfig};
use crate::core::engine::ScriptEngine;
use crate::core::tree::{ANGLE_RANGE, DEPTH_RANGE, MIN_START_LENGTH, REDUCTION_RANGE};
use crate::core::{Pipeline, Storage};
use crate::domain::model::{CipherKey, TreeParams};
use crate::utils::error::{KitError, Result};
use crate::utils::prompt::{Console, Notices};
use std::io::{BufRead, Write};

const REDO_PROMPT: &str = "Do you want to redo the encryption and decryption process? (y/n): ";
const REDO_INVALID: &str = "Invalid input! Please enter 'y' for yes or 'n' for no.";

/// 加解密互動流程。指定 `fixed_key` 時只執行一次，不再詢問。
///
/// 回傳實際執行的次數。
pub async fn run_cipher_session<R, W, S>(
    console: &mut Console<R, W>,
    storage: S,
    config: CipherConfig,
    fixed_key: Option<CipherKey>,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
    S: Storage + Clone,
{
    if let Some(key) = fixed_key {
        run_cipher_once(console, storage, config, key).await?;
        return Ok(1);
    }

    let mut runs = 0;
    loop {
        let n = console.prompt_integer("Enter the value for n: ")?;
        let m = console.prompt_integer("Enter the value for m: ")?;
        run_cipher_once(console, storage.clone(), config.clone(), CipherKey::new(n, m)).await?;
        runs += 1;

        if !console.prompt_yes_no(REDO_PROMPT, REDO_INVALID)? {
            console.say("Exiting the program.")?;
            return Ok(runs);
        }
    }
}

async fn run_cipher_once<R, W, S>(
    console: &mut Console<R, W>,
    storage: S,
    config: CipherConfig,
    key: CipherKey,
) -> Result<String>
where
    R: BufRead,
    W: Write,
    S: Storage,
{
    let notices = Notices::new();
    let pipeline = CipherPipeline::new(storage, config, key).with_notices(notices.clone());
    run_with_notices(console, "cipher", pipeline, &notices).await
}

/// 執行管道後把累積的訊息印到主控台；失敗時也會先印出已產生的訊息。
async fn run_with_notices<R, W, P>(
    console: &mut Console<R, W>,
    name: &str,
    pipeline: P,
    notices: &Notices,
) -> Result<String>
where
    R: BufRead,
    W: Write,
    P: Pipeline,
{
    let result = ScriptEngine::new(name, pipeline).run().await;
    console.flush_notices(notices)?;
    result
}

pub async fn run_climate_session<R, W, S>(
    console: &mut Console<R, W>,
    storage: S,
    config: ClimateConfig,
) -> Result<String>
where
    R: BufRead,
    W: Write,
    S: Storage,
{
    let notices = Notices::new();
    let pipeline = ClimatePipeline::new(storage, config).with_notices(notices.clone());
    run_with_notices(console, "climate", pipeline, &notices).await
}

/// 補齊未在命令列或設定檔提供的樹參數。
pub fn collect_tree_params<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &TreeConfig,
) -> Result<TreeParams> {
    let angle_left = match config.angle_left {
        Some(v) => v,
        None => console.prompt_bounded(
            "Enter the left branch angle (in degrees): ",
            Some(ANGLE_RANGE.0),
            Some(ANGLE_RANGE.1),
        )?,
    };
    let angle_right = match config.angle_right {
        Some(v) => v,
        None => console.prompt_bounded(
            "Enter the right branch angle (in degrees): ",
            Some(ANGLE_RANGE.0),
            Some(ANGLE_RANGE.1),
        )?,
    };
    let start_length = match config.start_length {
        Some(v) => v,
        None => console.prompt_bounded(
            "Enter the starting branch length (in pixels): ",
            Some(MIN_START_LENGTH),
            None,
        )?,
    };
    let depth = match config.depth {
        Some(v) => v,
        None => {
            // 以 i64 讀入，負數才會得到範圍訊息而非「無效數字」
            let depth: i64 = console.prompt_bounded(
                "Enter the recursion depth: ",
                Some(i64::from(DEPTH_RANGE.0)),
                Some(i64::from(DEPTH_RANGE.1)),
            )?;
            u32::try_from(depth).map_err(|_| KitError::InvalidInputError {
                message: format!("Recursion depth {} is out of range", depth),
            })?
        }
    };
    let reduction_factor = match config.reduction_factor {
        Some(v) => v,
        None => console.prompt_bounded(
            "Enter the branch length reduction factor (as a decimal, e.g., 0.7 for 70%): ",
            Some(REDUCTION_RANGE.0),
            Some(REDUCTION_RANGE.1),
        )?,
    };

    Ok(TreeParams {
        angle_left,
        angle_right,
        start_length,
        depth,
        reduction_factor,
    })
}

pub async fn run_tree_session<R, W, S>(
    console: &mut Console<R, W>,
    storage: S,
    config: &TreeConfig,
) -> Result<String>
where
    R: BufRead,
    W: Write,
    S: Storage,
{
    let params = collect_tree_params(console, config)?;
    let notices = Notices::new();
    let pipeline =
        TreePipeline::new(storage, params, config.output_file.clone()).with_notices(notices.clone());
    run_with_notices(console, "tree", pipeline, &notices).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipelines::test_support::MockStorage;
    use crate::utils::validation::Validate;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn test_cipher_redo_loop_until_no() {
        let storage = MockStorage::new();
        storage.put("raw_text.txt", b"abc XYZ").await;

        let mut c = console("1\n2\nmaybe\ny\nx\n3\n4\nN\n");
        let runs = run_cipher_session(&mut c, storage.clone(), CipherConfig::default(), None)
            .await
            .unwrap();
        assert_eq!(runs, 2);

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert!(out.contains(REDO_INVALID));
        assert!(out.contains("Invalid input! Please enter an integer value."));
        assert!(out.trim_end().ends_with("Exiting the program."));

        // 最後一次使用 n=3, m=4
        let expected = crate::core::cipher::encrypt(
            "abc XYZ",
            CipherKey::new(3, 4),
            CipherConfig::default().scope,
        );
        assert_eq!(storage.get_string("encrypted_text.txt").await.unwrap(), expected);
        assert_eq!(storage.get_string("decrypted_text.txt").await.unwrap(), "abc XYZ");
    }

    #[tokio::test]
    async fn test_cipher_fixed_key_skips_prompts() {
        let storage = MockStorage::new();
        let mut c = console("");
        let runs = run_cipher_session(
            &mut c,
            storage.clone(),
            CipherConfig::default(),
            Some(CipherKey::new(2, 3)),
        )
        .await
        .unwrap();
        assert_eq!(runs, 1);
        assert!(storage.get_string("raw_text.txt").await.is_some());

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert_eq!(
            out,
            "raw_text.txt not found. Creating a sample text file...\n\
             Encryption successful! Encrypted text written to 'encrypted_text.txt'.\n\
             Decryption is successful!\n"
        );
        assert!(!out.contains("Enter the value"));
    }

    #[tokio::test]
    async fn test_cipher_messages_follow_each_run() {
        let storage = MockStorage::new();
        storage.put("raw_text.txt", b"abc").await;

        let mut c = console("1\n1\ny\n2\n2\nn\n");
        run_cipher_session(&mut c, storage, CipherConfig::default(), None)
            .await
            .unwrap();

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert_eq!(out.matches("Decryption is successful!").count(), 2);
        let first_success = out.find("Encryption successful!").unwrap();
        let first_redo = out.find(REDO_PROMPT).unwrap();
        assert!(first_success < first_redo);
    }

    #[tokio::test]
    async fn test_cipher_eof_aborts() {
        let mut c = console("5\n");
        let err = run_cipher_session(&mut c, MockStorage::new(), CipherConfig::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, KitError::AbortedError));
    }

    #[test]
    fn test_collect_tree_params_prompts_missing_only() {
        let config = TreeConfig {
            angle_left: Some(20.0),
            depth: Some(4),
            ..TreeConfig::default()
        };
        let mut c = console("200\n40\n150\n0.7\n");
        let params = collect_tree_params(&mut c, &config).unwrap();

        assert_eq!(params.angle_left, 20.0);
        assert_eq!(params.angle_right, 40.0);
        assert_eq!(params.start_length, 150.0);
        assert_eq!(params.depth, 4);
        assert_eq!(params.reduction_factor, 0.7);

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert!(!out.contains("left branch angle"));
        assert!(out.contains("Error: Please enter a value between 0.0 and 180.0."));
    }

    #[test]
    fn test_negative_depth_reports_range() {
        let config = TreeConfig {
            angle_left: Some(30.0),
            angle_right: Some(30.0),
            start_length: Some(100.0),
            reduction_factor: Some(0.7),
            ..TreeConfig::default()
        };
        let mut c = console("-3\n5\n");
        let params = collect_tree_params(&mut c, &config).unwrap();
        assert_eq!(params.depth, 5);

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert!(out.contains("Error: Please enter a value between 1 and 10."));
        assert!(!out.contains("Would you like to try again?"));
    }

    #[test]
    fn test_infinite_length_asks_again() {
        let mut c = console("30\n30\ninf\ny\n100\n5\n0.7\n");
        let params = collect_tree_params(&mut c, &TreeConfig::default()).unwrap();
        assert_eq!(params.start_length, 100.0);
        assert!(params.validate().is_ok());

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert!(out.contains("Error: Invalid input. Please enter a valid number."));
    }

    #[test]
    fn test_reduction_range_message_shows_decimal() {
        let config = TreeConfig {
            angle_left: Some(30.0),
            angle_right: Some(30.0),
            start_length: Some(100.0),
            depth: Some(3),
            ..TreeConfig::default()
        };
        let mut c = console("2\n0.5\n");
        collect_tree_params(&mut c, &config).unwrap();

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert!(out.contains("Error: Please enter a value between 0.1 and 1.0.\n"));
    }

    #[tokio::test]
    async fn test_tree_session_abort() {
        let mut c = console("abc\nn\n");
        let err = run_tree_session(&mut c, MockStorage::new(), &TreeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KitError::AbortedError));
    }

    #[tokio::test]
    async fn test_tree_session_draws() {
        let storage = MockStorage::new();
        let mut c = console("30\n30\n100\n3\n0.5\n");
        let location = run_tree_session(&mut c, storage.clone(), &TreeConfig::default())
            .await
            .unwrap();
        assert_eq!(location, "fractal_tree.svg");
        assert!(storage.get_string("fractal_tree.svg").await.is_some());

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert!(out.ends_with("Tree with 7 branches drawn to 'fractal_tree.svg'.\n"));
    }

    #[tokio::test]
    async fn test_climate_session_prints_skip_and_done() {
        let storage = MockStorage::new();
        storage
            .put(
                "temperature_data/stations_group_1990.csv",
                b"STATION_NAME,January,February,March,April,May,June,July,August,September,October,November,December\n\
                  ALICE,1,2,3,4,5,6,7,8,9,10,11,12\n",
            )
            .await;
        storage
            .put("temperature_data/stations_group_1991.csv", b"STATION_NAME,January\nALICE,x\n")
            .await;

        let mut c = console("");
        run_climate_session(&mut c, storage.clone(), ClimateConfig::default())
            .await
            .unwrap();

        let out = String::from_utf8(c.into_writer()).unwrap();
        assert!(out.starts_with("Error reading stations_group_1991.csv: "));
        assert!(out.ends_with("Results saved to files.\n"));
    }

    #[tokio::test]
    async fn test_climate_session_empty_dir_prints_nothing() {
        let storage = MockStorage::new();
        storage.create_dir("temperature_data").await;

        let mut c = console("");
        let err = run_climate_session(&mut c, storage.clone(), ClimateConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KitError::NoDataError { .. }));
        assert!(c.into_writer().is_empty());
        assert!(storage.paths().await.is_empty());
    }
}
