//! Ranking handler: top-5 popular products for a category.

use crate::ports::OutgoingMessage;

use super::HandlerContext;

const SYSTEM_PROMPT: &str = "\
你是一個專業的3C產品排行榜助手。請根據用戶提供的產品類型，提供台灣地區最熱門的前五名產品排行。

回覆要求：
1. 只提供台灣地區的商品排行
2. 價格必須使用新台幣（NT$）為單位
3. 每個產品應包含簡短的規格亮點和價格區間
4. 排行應基於最新的市場數據
5. 只列出前五名產品
6. 如果可能，標明排行的來源和更新時間";

const ERROR_PREFIX: &str = "查詢排行時發生錯誤：";

/// Answers a popularity-ranking query for `product_type`.
pub async fn handle(ctx: &HandlerContext, product_type: &str) -> Vec<OutgoingMessage> {
    let user_prompt = format!("請提供台灣地區最熱門的前五名{}排行榜", product_type);

    match ctx
        .ask(
            SYSTEM_PROMPT,
            user_prompt,
            &ctx.wide_search_model,
            ERROR_PREFIX,
        )
        .await
    {
        Ok(answer) => vec![OutgoingMessage::text(answer)],
        Err(error_reply) => vec![error_reply],
    }
}
