//! Recommend handler: second phase of the two-turn recommend flow.
//!
//! The first turn (handled by the router) stashes the device type into the
//! user's context; this handler combines it with the requirements text.
//!
//! The underlying prompt sometimes misjudges valid device types as outside
//! the 3C domain. The configurable domain policy decides who wins: with
//! `KeywordList` a locally-known device type downgrades the model's
//! refusal to a fallback helper; with `ModelJudgment` the model's answer
//! passes through untouched.

use crate::config::DomainPolicy;
use crate::ports::OutgoingMessage;

use super::HandlerContext;

const SYSTEM_PROMPT: &str = "\
你是一個專業的3C產品推薦助手。請根據用戶提供的裝置類型、需求和預算，推薦最適合的產品。

回覆要求：
1. 回覆必須控制在500字以內
2. 只推薦台灣發行版本的產品
3. 推薦應基於用戶的具體需求和預算
4. 每個推薦產品應包含簡短的規格說明和推薦理由
5. 推薦3-5款不同價位或不同品牌的產品，以供用戶選擇
6. 如果用戶預算不足以滿足需求，應誠實說明並提供最接近的選擇
7. 如果裝置類型不屬於3C產品，請以「非3C產品」開頭說明無法推薦";

const ERROR_PREFIX: &str = "推薦時發生錯誤：";

const FALLBACK_REPLY: &str = "\
這個裝置類型屬於3C產品，但目前找不到合適的推薦結果。\
請換個方式描述需求（例如品牌偏好、主要用途、預算區間），然後再試一次。";

/// 3C categories the keyword policy recognizes. A device type mentioning
/// any of these is in-domain regardless of the model's own judgment.
const KNOWN_DEVICE_TYPES: &[&str] = &[
    "手機",
    "智慧型手機",
    "筆電",
    "筆記型電腦",
    "平板",
    "耳機",
    "喇叭",
    "音響",
    "相機",
    "螢幕",
    "顯示器",
    "鍵盤",
    "滑鼠",
    "手錶",
    "智慧手錶",
    "手環",
    "電腦",
    "桌機",
    "主機",
    "遊戲機",
    "路由器",
    "充電器",
    "行動電源",
    "電視",
];

/// Phrases marking the model's answer as an out-of-domain refusal.
const REFUSAL_MARKERS: &[&str] = &["非3C產品", "不是3C產品", "不屬於3C"];

/// True when the keyword allowlist recognizes `device_type` as 3C.
pub fn is_known_device_type(device_type: &str) -> bool {
    KNOWN_DEVICE_TYPES
        .iter()
        .any(|keyword| device_type.contains(keyword))
}

/// True when the answer reads as an out-of-domain refusal.
fn looks_out_of_domain(answer: &str) -> bool {
    REFUSAL_MARKERS.iter().any(|marker| answer.contains(marker))
}

/// Recommends products for `device_type` given `requirements`.
pub async fn handle(
    ctx: &HandlerContext,
    device_type: &str,
    requirements: &str,
) -> Vec<OutgoingMessage> {
    let user_prompt = format!(
        "請推薦適合的{}，需求和預算如下：{}",
        device_type, requirements
    );

    match ctx
        .ask(
            SYSTEM_PROMPT,
            user_prompt,
            &ctx.wide_search_model,
            ERROR_PREFIX,
        )
        .await
    {
        Ok(answer) => {
            let disagreement = ctx.domain_policy == DomainPolicy::KeywordList
                && looks_out_of_domain(&answer)
                && is_known_device_type(device_type);

            if disagreement {
                tracing::info!(
                    device_type = device_type,
                    "model judged a known 3C device type out-of-domain, offering fallback"
                );
                vec![OutgoingMessage::text(FALLBACK_REPLY)]
            } else {
                vec![OutgoingMessage::text(answer)]
            }
        }
        Err(error_reply) => vec![error_reply],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockCompletionService;
    use crate::application::handlers::test_context;
    use crate::config::DomainPolicy;

    #[test]
    fn keyword_list_recognizes_3c_types() {
        assert!(is_known_device_type("耳機"));
        assert!(is_known_device_type("電競筆電"));
        assert!(is_known_device_type("無線滑鼠"));
        assert!(!is_known_device_type("沙發"));
        assert!(!is_known_device_type(""));
    }

    #[tokio::test]
    async fn passes_both_slot_values_to_the_service() {
        let mock = MockCompletionService::new().with_response("推薦如下");
        let ctx = test_context(mock.clone());

        let messages = handle(&ctx, "耳機", "預算1000元").await;

        assert_eq!(messages[0].text_content(), "推薦如下");
        let prompt = &mock.calls()[0].user_prompt;
        assert!(prompt.contains("耳機"));
        assert!(prompt.contains("預算1000元"));
    }

    #[tokio::test]
    async fn refusal_for_known_type_becomes_fallback() {
        let mock =
            MockCompletionService::new().with_response("非3C產品：耳機不在推薦範圍內。");
        let ctx = test_context(mock);

        let messages = handle(&ctx, "耳機", "預算1000元").await;

        assert_eq!(messages[0].text_content(), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn refusal_for_unknown_type_passes_through() {
        let mock = MockCompletionService::new().with_response("非3C產品：無法推薦沙發。");
        let ctx = test_context(mock);

        let messages = handle(&ctx, "沙發", "預算5000元").await;

        assert!(messages[0].text_content().contains("非3C產品"));
    }

    #[tokio::test]
    async fn model_judgment_policy_trusts_the_refusal() {
        let mock =
            MockCompletionService::new().with_response("非3C產品：耳機不在推薦範圍內。");
        let mut ctx = test_context(mock);
        ctx.domain_policy = DomainPolicy::ModelJudgment;

        let messages = handle(&ctx, "耳機", "預算1000元").await;

        assert!(messages[0].text_content().contains("非3C產品"));
    }
}
