//! Price query handler: current Taiwan prices, plus a quick-reply offer to
//! add the queried model to the wishlist.

use crate::ports::{OutgoingMessage, QuickReplyItem};

use super::HandlerContext;

const SYSTEM_PROMPT: &str = "\
你是一個專業的3C產品價格查詢助手。請根據用戶提供的產品型號，提供該產品在台灣地區的最新價格信息。

回覆要求：
1. 只提供台灣地區的商品價格，使用新台幣（NT$）為單位
2. 如果有多個版本或顏色，請列出各版本的價格
3. 如果可能，提供不同通路的價格比較（如官網、電商平台等）
4. 標明價格的來源和更新時間
5. 如果找不到確切型號的價格，請明確說明並提供最相近型號的價格信息
6. 盡可能的減少特殊字符 ex: ** | - 等 以換行做區隔
7. 請盡可能的使用繁體中文回覆";

const ERROR_PREFIX: &str = "查詢時發生錯誤：";

/// Prefix the add-to-wishlist quick reply sends back through the router.
pub const ADD_COMMAND_PREFIX: &str = "添加到願望清單:";

/// Text the decline quick reply sends back.
pub const DECLINE_COMMAND: &str = "不添加";

/// Answers a price query and offers to wishlist the model.
pub async fn handle(ctx: &HandlerContext, product_model: &str) -> Vec<OutgoingMessage> {
    let user_prompt = format!("請提供{}在台灣地區的最新價格信息", product_model);

    match ctx
        .ask(SYSTEM_PROMPT, user_prompt, &ctx.search_model, ERROR_PREFIX)
        .await
    {
        Ok(answer) => vec![
            OutgoingMessage::text(answer),
            OutgoingMessage::with_quick_replies(
                "是否要將此產品添加到願望清單？",
                vec![
                    QuickReplyItem::message(
                        "添加到願望清單",
                        format!("{}{}", ADD_COMMAND_PREFIX, product_model),
                    ),
                    QuickReplyItem::message(DECLINE_COMMAND, DECLINE_COMMAND),
                ],
            ),
        ],
        Err(error_reply) => vec![error_reply],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockCompletionError, MockCompletionService};
    use crate::application::handlers::test_context;

    #[tokio::test]
    async fn success_returns_answer_plus_quick_replies() {
        let mock = MockCompletionService::new().with_response("NT$ 32,900 起");
        let ctx = test_context(mock);

        let messages = handle(&ctx, "iPhone 15 Pro").await;

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text_content(), "NT$ 32,900 起");

        let json = serde_json::to_value(&messages[1]).unwrap();
        assert_eq!(
            json["quickReply"]["items"][0]["action"]["text"],
            "添加到願望清單:iPhone 15 Pro"
        );
        assert_eq!(json["quickReply"]["items"][1]["action"]["text"], "不添加");
    }

    #[tokio::test]
    async fn failure_returns_single_error_reply() {
        let mock = MockCompletionService::new().with_error(MockCompletionError::Unavailable {
            message: "503".to_string(),
        });
        let ctx = test_context(mock);

        let messages = handle(&ctx, "iPhone 15 Pro").await;

        // No wishlist offer without an answer.
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text_content().starts_with("查詢時發生錯誤："));
    }
}
