//! Prompt and response-schema construction.
//!
//! Both builders are pure: the same inputs always produce the same prompt and
//! schema. Content rules the schema cannot express (for example "the
//! optimized script stays in the source language") are stated explicitly in
//! the prompt and in the schema descriptions, since nothing downstream can
//! check them.

use deconstruct_models::{BriefField, Platform, SupportedLanguage};
use serde_json::{json, Value};

/// Prompt plus response schema for one analysis call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPrompt {
    pub prompt: String,
    pub schema: Value,
}

/// Build the analysis instruction and its structured output schema.
pub fn build_analysis_prompt(platform: Platform) -> AnalysisPrompt {
    AnalysisPrompt {
        prompt: analysis_instructions(platform),
        schema: analysis_schema(),
    }
}

fn analysis_instructions(platform: Platform) -> String {
    let languages = SupportedLanguage::prompt_list();

    format!(
        r#"你是一位资深的短视频内容分析专家，为专业的中国出海内容团队提供服务。
请分析这个视频，它计划发布在 {platform} 平台上。

请完成以下任务：
1. **识别语言**：识别视频中的主要口语语言，必须是以下之一：{languages}。
2. **原文听写**：逐字听写视频中的原始语音内容 (Original Script)。
3. **中文翻译**：将听写内容完整、准确地翻译成简体中文 (Chinese Script)。
4. **结构分析**：请用**中文**简练概括视频的：
   - 黄金3秒开头 (Hook)：开篇如何抓住注意力？
   - 中段内容 (Body)：核心叙事逻辑是什么？
   - 结尾引导 (CTA)：如何引导互动或转化？
   - 视频节奏 (Pacing)：整体剪辑与叙事节奏如何？
5. **爆款亮点**：用**中文**列出容易引发传播的亮点、槽点或爽点。
6. **优化建议**：结合 {platform} 平台的算法机制和用户偏好，用**中文**列出能提升播放数据的具体优化建议。
7. **优化文案 (Optimized Script)**：基于优化建议改写原始口播文案：
   - 强化黄金3秒开头；
   - 删减冗余信息，提升信息密度；
   - 增强情绪感染力或互动引导。
   请提供：
   - original：优化后的原文。**必须与原视频的口语语言严格一致**：原视频是葡萄牙语就输出葡萄牙语，是英语就输出英语。
   - cn：优化后文案的中文翻译。
8. **翻拍脚本 Brief**：生成一份用于指导不懂中文的外籍创作者复刻该视频的脚本。
   三个部分都必须包含 'cn'（中文指导，给运营看）和 'target'（目标语言文案，给创作者看）。
   **导出图片需要排版清晰，所有内容必须分行书写，不要堆成一大段。**
   - shootingGuide（拍摄指导）：
     cn：分镜画面、运镜方式、场景布置、演员动作与表情。每条指令单独一行，可使用 • 或 - 列表符号。
     target: Camera angles, scene setup and actor performance, one instruction per line.
   - scriptReference（口播文案参考）：
     cn：核心台词、旁白或字幕的中文翻译，严格按句分行，与外语原文逐行对应。
     target: The spoken script or text overlays in the original language of the video, line by line.
   - sellingPoints（产品卖点/核心价值）：
     cn：需要重点展示的功能点、痛点解决方案或情绪价值，每行一个卖点。
     target: Key selling points or value propositions, one bullet per line.
   - targetLanguage：识别出的目标语言名称（英文）。

请只返回符合指定 Schema 的 JSON 数据。"#
    )
}

fn string_field(description: Option<&str>) -> Value {
    match description {
        Some(description) => json!({ "type": "STRING", "description": description }),
        None => json!({ "type": "STRING" }),
    }
}

fn dual_language_field(cn_description: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "cn": string_field(Some(cn_description)),
            "target": string_field(None),
        },
        "required": ["cn", "target"],
    })
}

fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "detectedLanguage": string_field(None),
            "originalScript": string_field(None),
            "chineseScript": string_field(None),
            "optimizedScript": {
                "type": "OBJECT",
                "properties": {
                    "original": string_field(Some(
                        "Rewritten script in the SAME language as the original video source."
                    )),
                    "cn": string_field(Some("Chinese translation of the optimized script")),
                },
                "required": ["original", "cn"],
            },
            "structure": {
                "type": "OBJECT",
                "properties": {
                    "hook": string_field(Some("Analysis of the first 3 seconds/hook in Chinese")),
                    "body": string_field(Some("Analysis of the main content body in Chinese")),
                    "cta": string_field(Some("Analysis of the CTA/ending in Chinese")),
                    "pacing": string_field(Some("Analysis of the video pacing in Chinese")),
                },
                "required": ["hook", "body", "cta", "pacing"],
            },
            "highlights": { "type": "ARRAY", "items": string_field(None) },
            "optimizationSuggestions": { "type": "ARRAY", "items": string_field(None) },
            "initialBrief": {
                "type": "OBJECT",
                "properties": {
                    "targetLanguage": string_field(None),
                    "shootingGuide": dual_language_field(
                        "Chinese shooting instructions, with clear line breaks"
                    ),
                    "scriptReference": dual_language_field(
                        "Chinese translation of the script lines, line-by-line"
                    ),
                    "sellingPoints": dual_language_field("Chinese selling points, one per line"),
                },
                "required": ["targetLanguage", "shootingGuide", "scriptReference", "sellingPoints"],
            },
        },
        "required": [
            "detectedLanguage",
            "originalScript",
            "chineseScript",
            "optimizedScript",
            "structure",
            "highlights",
            "optimizationSuggestions",
            "initialBrief",
        ],
    })
}

/// Build the free-text prompt for translating one brief section.
pub fn build_translation_prompt(text: &str, target_lang: &str, field: BriefField) -> String {
    format!(
        r#"你是一位专业的视频本地化专家。
请将以下视频 Brief 中的中文指令/文案翻译成地道、自然的 {target_lang}。

当前上下文：{context}（shootingGuide=拍摄指导，scriptReference=口播文案，sellingPoints=产品卖点）

中文原文："{text}"

翻译要求：
1. 保持与原文一致的结构格式（原文是列表就保持列表）。
2. **每一条指令或句子单独一行，不要合并成一段。**
3. 只返回翻译后的文本，不要包含任何解释。"#,
        context = field.as_str(),
    )
}
