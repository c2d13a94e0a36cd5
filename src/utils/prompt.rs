use crate::utils::error::{KitError, Result};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// 可從提示讀入的數值型別。
pub trait PromptValue: FromStr + PartialOrd + Copy {
    /// inf / NaN 一律視為無效輸入
    fn is_usable(&self) -> bool;
    /// 範圍訊息中的寫法；浮點數保留小數點 (`1.0`)
    fn label(&self) -> String;
}

impl PromptValue for f64 {
    fn is_usable(&self) -> bool {
        self.is_finite()
    }

    fn label(&self) -> String {
        format!("{:?}", self)
    }
}

impl PromptValue for i64 {
    fn is_usable(&self) -> bool {
        true
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

/// 管道執行中產生、要顯示給使用者的訊息。
///
/// 管道不直接碰主控台，由呼叫端在步驟之間交給 [`Console::flush_notices`]。
#[derive(Debug, Clone, Default)]
pub struct Notices {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.push(line.into());
    }

    pub fn drain(&self) -> Vec<String> {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *lines)
    }
}

/// 互動式主控台：讀取使用者輸入並輸出提示訊息。
///
/// 讀寫端皆可替換，測試時以記憶體緩衝取代 stdin/stdout。
pub struct Console<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message)?;
        Ok(())
    }

    pub fn flush_notices(&mut self, notices: &Notices) -> Result<()> {
        for line in notices.drain() {
            self.say(&line)?;
        }
        Ok(())
    }

    /// 顯示提示並讀取一行（去除前後空白）。輸入結束 (EOF) 視為使用者中止。
    pub fn prompt_input(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut input = String::new();
        let read = self.reader.read_line(&mut input)?;
        if read == 0 {
            tracing::debug!("Input stream closed while waiting for: {}", prompt.trim());
            return Err(KitError::AbortedError);
        }

        Ok(input.trim().to_string())
    }

    /// 重複詢問直到取得整數。
    pub fn prompt_integer(&mut self, prompt: &str) -> Result<i64> {
        loop {
            let input = self.prompt_input(prompt)?;
            match input.parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say("Invalid input! Please enter an integer value.")?,
            }
        }
    }

    /// y/n 問答，不分大小寫；其他輸入會顯示 `invalid_message` 並重問。
    pub fn prompt_yes_no(&mut self, prompt: &str, invalid_message: &str) -> Result<bool> {
        loop {
            let answer = self.prompt_input(prompt)?.to_lowercase();
            match answer.as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => self.say(invalid_message)?,
            }
        }
    }

    /// 讀取數值並檢查範圍。
    ///
    /// 超出範圍時直接重問；無法解析（含 inf / NaN）時會先詢問是否重試，
    /// 回答 `n` 則回傳 [`KitError::AbortedError`]。
    pub fn prompt_bounded<T: PromptValue>(
        &mut self,
        prompt: &str,
        min: Option<T>,
        max: Option<T>,
    ) -> Result<T> {
        loop {
            let input = self.prompt_input(prompt)?;
            match input.parse::<T>().ok().filter(PromptValue::is_usable) {
                Some(value) => {
                    let below = min.is_some_and(|min| !(value >= min));
                    let above = max.is_some_and(|max| !(value <= max));
                    if below || above {
                        self.say(&range_message(min, max))?;
                        continue;
                    }
                    return Ok(value);
                }
                None => self.say("Error: Invalid input. Please enter a valid number.")?,
            }

            let retry = self.prompt_input("Would you like to try again? (y/n): ")?;
            if retry.to_lowercase() == "n" {
                self.say("Exiting the program.")?;
                return Err(KitError::AbortedError);
            }
        }
    }
}

fn range_message<T: PromptValue>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(
            "Error: Please enter a value between {} and {}.",
            min.label(),
            max.label()
        ),
        (Some(min), None) => format!("Error: Please enter a value of at least {}.", min.label()),
        (None, Some(max)) => format!("Error: Please enter a value of at most {}.", max.label()),
        (None, None) => "Error: Please enter a valid value.".to_string(),
    }
}
