//! Review handler: professional review summary for a device model.

use crate::ports::OutgoingMessage;

use super::HandlerContext;

const SYSTEM_PROMPT: &str = "\
你是一個專業的3C產品評價助手。請根據用戶提供的產品型號，提供該產品的專業評價摘要。

回覆要求：
1. 回覆必須控制在500字以內
2. 確保評價針對的是台灣發行版本的產品
3. 評價應包括產品的優點和缺點
4. 評價應基於專業測評和用戶反饋
5. 在回覆的最後，提供兩個專業評測的網頁鏈結
6. 如果找不到確切型號的評價，請明確說明並提供最相近型號的評價
7. 盡可能的減少特殊字符 ex: ** 等 避免在line上排版不好";

const ERROR_PREFIX: &str = "查詢評價時發生錯誤：";

/// Answers a review query for `product_model`.
pub async fn handle(ctx: &HandlerContext, product_model: &str) -> Vec<OutgoingMessage> {
    let user_prompt = format!("請提供{}的專業評價摘要和兩個專業評測的網頁鏈結", product_model);

    match ctx
        .ask(SYSTEM_PROMPT, user_prompt, &ctx.search_model, ERROR_PREFIX)
        .await
    {
        Ok(answer) => vec![OutgoingMessage::text(answer)],
        Err(error_reply) => vec![error_reply],
    }
}
