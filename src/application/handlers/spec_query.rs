//! Spec query handler: detailed specifications for a device model.

use crate::ports::OutgoingMessage;

use super::HandlerContext;

const SYSTEM_PROMPT: &str = "\
你是一個專業的3C產品規格查詢助手。請根據用戶提供的產品型號，提供該產品的詳細規格信息。

回覆要求：
1. 回覆必須控制在500字以內
2. 只提供裝置規格信息，不要包含價格、評價或其他非規格信息
3. 確保提供的是台灣發行版本的規格
4. 格式應清晰易讀，可使用項目符號或表格形式
5. 如果找不到確切型號，請明確說明並提供最相近型號的信息";

const ERROR_PREFIX: &str = "查詢時發生錯誤：";

/// Answers a spec query for `product_model`.
pub async fn handle(ctx: &HandlerContext, product_model: &str) -> Vec<OutgoingMessage> {
    let user_prompt = format!("請提供{}的詳細規格信息", product_model);

    match ctx
        .ask(SYSTEM_PROMPT, user_prompt, &ctx.search_model, ERROR_PREFIX)
        .await
    {
        Ok(answer) => vec![OutgoingMessage::text(answer)],
        Err(error_reply) => vec![error_reply],
    }
}
