//! Compare handler: side-by-side comparison of exactly two device models.

use crate::ports::OutgoingMessage;

use super::HandlerContext;

const SYSTEM_PROMPT: &str = "\
你是一個專業的3C產品比較助手。請根據用戶提供的兩個產品型號，提供這兩個產品的詳細比較。

回覆要求：
1. 回覆必須控制在500字以內
2. 確保比較的是台灣發行版本的產品
3. 比較應包括但不限於：性能、相機、電池、顯示屏、設計、價格等關鍵方面
4. 使用清晰的分類方式呈現比較結果
5. 在比較的最後，根據不同使用場景給出簡短的建議
6. 如果找不到確切型號，請明確說明並提供最相近型號的比較
7. 盡可能的減少特殊字符 ex: ** | - 等 以換行做區隔
8. 顯示屏==螢幕（避免使用中國名詞，使用台灣的名詞）
9. 來源網址提供在回覆的最下方
10. 請盡可能的使用繁體中文回覆";

const ERROR_PREFIX: &str = "比較時發生錯誤：";

const USAGE_REPLY: &str = "請輸入兩個產品型號，以逗號分隔。例如：iPhone 13, Samsung S21";

/// Splits the slot text into exactly two trimmed, non-empty product names.
///
/// Accepts both ASCII and fullwidth commas. Anything other than exactly
/// two fields is malformed.
pub fn parse_products(input: &str) -> Option<(String, String)> {
    let fields: Vec<&str> = input
        .split(|c| c == ',' || c == '，')
        .map(str::trim)
        .collect();

    match fields.as_slice() {
        [first, second] if !first.is_empty() && !second.is_empty() => {
            Some((first.to_string(), second.to_string()))
        }
        _ => None,
    }
}

/// Answers a comparison query; malformed input short-circuits with the
/// usage reply and no completion call.
pub async fn handle(ctx: &HandlerContext, input: &str) -> Vec<OutgoingMessage> {
    let Some((first, second)) = parse_products(input) else {
        return vec![OutgoingMessage::text(USAGE_REPLY)];
    };

    let user_prompt = format!("請比較{}和{}這兩款產品的優缺點和適用場景", first, second);

    match ctx
        .ask(SYSTEM_PROMPT, user_prompt, &ctx.search_model, ERROR_PREFIX)
        .await
    {
        Ok(answer) => vec![OutgoingMessage::text(answer)],
        Err(error_reply) => vec![error_reply],
    }
}
