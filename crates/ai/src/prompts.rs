//! Prompt templates and composition.
//!
//! Everything here is pure string assembly, so the exact text sent to the
//! oracle can be asserted without one.

use nippo_core::{DailyReport, PolitenessLevel, TaskId};

use crate::preferences::{AiPreferences, Language, ToneKey};
use crate::report::CandidateTask;

/// Heading that introduces user-supplied custom instructions.
pub const CUSTOM_INSTRUCTIONS_HEADING: &str = "### ユーザーからの追加指示";

/// Notice used in place of the task list when the reporter has no active tasks.
pub const NO_ACTIVE_TASKS_NOTICE: &str = "（現在アクティブな担当タスクはありません）";

const BASE_PREAMBLE: &str = "あなたは日本企業の業務日報を作成するアシスタントです。\
ユーザーが書いた箇条書きや走り書きのメモを、指定されたスタイルの日報に清書してください。\
メモに書かれていない事実を追加・捏造してはいけません。";

const LEVEL_1: &str = "### 丁寧さレベル1（フランク）\n\
同僚へのチャットのような短い口語で、要点だけをまとめてください。敬語は不要です。";

const LEVEL_2: &str = "### 丁寧さレベル2（カジュアル）\n\
です・ます調を基本に、親しみやすく簡潔にまとめてください。";

const LEVEL_3: &str = "### 丁寧さレベル3（標準）\n\
一般的なビジネス敬語で、上司にそのまま提出できる日報にしてください。";

const LEVEL_4: &str = "### 丁寧さレベル4（丁寧）\n\
尊敬語・謙譲語を適切に使い分け、部門長や取引先にも提出できる丁寧な文面にしてください。";

const LEVEL_5: &str = "### 丁寧さレベル5（最上級）\n\
伝統的な大企業の稟議書のように、最大限にへりくだった定型表現\
（「お疲れ様でございます」「何卒よろしくお願い申し上げます」等）を用い、\
冒頭の挨拶と結びの言葉を必ず含めてください。";

const TONE_PROFESSIONAL: &str = "### トーン\n\
プロフェッショナルなビジネス文体で、客観的かつ簡潔に記述してください。";

const TONE_CONCISE: &str = "### トーン\n\
箇条書きを中心に、だ・である調で要点のみを簡潔に記述してください。";

const TONE_ENGLISH: &str = "### Tone\n\
Write the entire report in English, using a clear and Professional business tone.";

const TONE_ENTHUSIASTIC: &str = "### トーン\n\
熱血で前向きなトーンで、成果と次への意欲が伝わるように記述してください。";

const ENGLISH_OUTPUT_DIRECTIVE: &str =
    "### Output language\nWrite the subject and body in English.";

/// Base instruction registered for a politeness level.
///
/// Levels without a registered template use the level-3 template.
pub fn base_instruction(level: i64) -> String {
    let block = match level {
        1 => LEVEL_1,
        2 => LEVEL_2,
        3 => LEVEL_3,
        4 => LEVEL_4,
        5 => LEVEL_5,
        _ => LEVEL_3,
    };
    format!("{BASE_PREAMBLE}\n\n{block}")
}

pub fn tone_instruction(tone: ToneKey) -> &'static str {
    match tone {
        ToneKey::Professional => TONE_PROFESSIONAL,
        ToneKey::Concise => TONE_CONCISE,
        ToneKey::English => TONE_ENGLISH,
        ToneKey::Enthusiastic => TONE_ENTHUSIASTIC,
    }
}

/// Combine a base instruction with a tone block and optional custom instructions.
///
/// The custom block is only appended when `custom_instructions` has non-whitespace
/// content; its text is inserted verbatim.
pub fn compose(base_instruction: &str, tone: ToneKey, custom_instructions: &str) -> String {
    let mut prompt = format!("{base_instruction}\n\n{}", tone_instruction(tone));
    if !custom_instructions.trim().is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(CUSTOM_INSTRUCTIONS_HEADING);
        prompt.push('\n');
        prompt.push_str(custom_instructions);
    }
    prompt
}

/// [`compose`] for a tone stored as a free-form key.
pub fn compose_with_key(
    base_instruction: &str,
    tone_key: &str,
    custom_instructions: &str,
) -> String {
    compose(base_instruction, ToneKey::from_key(tone_key), custom_instructions)
}

fn instruction_for(base: String, preferences: Option<&AiPreferences>) -> String {
    match preferences {
        None => base,
        Some(prefs) => {
            let mut prompt = compose(&base, prefs.tone, &prefs.custom_instructions);
            if prefs.language == Language::En && prefs.tone != ToneKey::English {
                prompt.push_str("\n\n");
                prompt.push_str(ENGLISH_OUTPUT_DIRECTIVE);
            }
            prompt
        }
    }
}

pub(crate) fn task_context(candidate_tasks: &[CandidateTask]) -> String {
    let mut block = String::from("### 担当タスク一覧\n");
    if candidate_tasks.is_empty() {
        block.push_str(NO_ACTIVE_TASKS_NOTICE);
        block.push_str("\n\n### 工数抽出\nwork_logs は空の配列にしてください。");
        return block;
    }

    block.push_str("報告者が現在担当しているタスクです（形式: ID | タスク名）。\n");
    for task in candidate_tasks {
        block.push_str(&format!("- {} | {}\n", task.id, task.title));
    }
    block.push_str(
        "\n### 工数抽出\n\
入力テキストの内容が上記タスクのいずれかに明確に該当する場合に限り、\
そのタスクのIDと推定作業時間（時間単位、0以上の数値）を work_logs に含めてください。\
一覧にないIDを作ってはいけません。該当しない作業は含めないでください。",
    );
    block
}

/// Full prompt for a daily report generation call.
pub fn report_prompt(
    raw_content: &str,
    politeness_level: Option<PolitenessLevel>,
    candidate_tasks: &[CandidateTask],
    preferences: Option<&AiPreferences>,
) -> String {
    let level = politeness_level.map(|l| i64::from(l.get())).unwrap_or(3);
    let instruction = instruction_for(base_instruction(level), preferences);

    format!(
        "{instruction}\n\n{tasks}\n\n### 出力形式\n\
次のキーを持つJSONオブジェクトのみを出力してください。\n\
- subject: 日報の件名\n\
- content_polished: 清書した本文\n\
- politeness_level: 1〜5の整数\n\
- work_logs: task_id と hours を持つオブジェクトの配列\n\n\
### 入力テキスト\n{raw_content}",
        tasks = task_context(candidate_tasks),
    )
}

const WEEKLY_PREAMBLE: &str = "あなたは業務週報を作成するアシスタントです。\
以下の日報をもとに、今週の成果・課題・来週の予定を整理した週報本文を作成してください。\
日報に書かれていない事実を追加してはいけません。";

/// Full prompt for summary mode (one weekly body from several daily reports).
///
/// Reports are listed in the order given; callers pass them sorted by date.
pub fn weekly_prompt(reports: &[DailyReport], preferences: Option<&AiPreferences>) -> String {
    let base = match (reports.first(), reports.last()) {
        (Some(first), Some(last)) => format!(
            "{WEEKLY_PREAMBLE}\n対象期間: {} 〜 {}",
            first.report_date, last.report_date
        ),
        _ => WEEKLY_PREAMBLE.to_string(),
    };
    let mut prompt = instruction_for(base, preferences);

    prompt.push_str("\n\n### 日報");
    for report in reports {
        prompt.push_str(&format!("\n\n#### {}", report.report_date));
        if let Some(subject) = report.subject.as_deref().filter(|s| !s.trim().is_empty()) {
            prompt.push_str(&format!(" {subject}"));
        }
        prompt.push('\n');
        prompt.push_str(report.body());
        if !report.work_logs.is_empty() {
            let logged: Vec<String> = report
                .work_logs
                .iter()
                .map(|log| {
                    let label = task_label(log.task_id, log.task_title.as_deref());
                    format!("{label}: {}h", format_hours(log.hours))
                })
                .collect();
            prompt.push_str(&format!("\n工数: {}", logged.join(", ")));
        }
    }

    let totals = weekly_hours(reports);
    if !totals.is_empty() {
        prompt.push_str("\n\n### タスク別工数合計");
        for (label, hours) in &totals {
            prompt.push_str(&format!("\n- {label}: {}h", format_hours(*hours)));
        }
    }

    prompt.push_str(
        "\n\n### 出力形式\n\
content キーに週報本文（プレーンテキスト）を持つJSONオブジェクトのみを出力してください。",
    );
    prompt
}

fn task_label(task_id: TaskId, title: Option<&str>) -> String {
    match title {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => task_id.to_string(),
    }
}

/// Two decimals at most, without trailing zeros (`1.50` → `1.5`, `2.00` → `2`).
fn format_hours(hours: f64) -> String {
    let fixed = format!("{hours:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Hours per task across all reports, in order of first appearance.
pub(crate) fn weekly_hours(reports: &[DailyReport]) -> Vec<(String, f64)> {
    let mut totals: Vec<(TaskId, String, f64)> = Vec::new();
    for log in reports.iter().flat_map(|r| r.work_logs.iter()) {
        match totals.iter_mut().find(|(id, _, _)| *id == log.task_id) {
            Some((_, _, hours)) => *hours += log.hours,
            None => totals.push((
                log.task_id,
                task_label(log.task_id, log.task_title.as_deref()),
                log.hours,
            )),
        }
    }
    totals.into_iter().map(|(_, label, hours)| (label, hours)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use nippo_core::{ReportId, TenantId, UserId, WorkLog};
    use proptest::prelude::*;

    const BASE: &str = "基本プロンプト";

    #[test]
    fn professional_tone_is_included() {
        let prompt = compose(BASE, ToneKey::Professional, "");
        assert!(prompt.starts_with(BASE));
        assert!(prompt.contains("プロフェッショナル"));
    }

    #[test]
    fn concise_tone_asks_for_bullets_and_plain_form() {
        let prompt = compose(BASE, ToneKey::Concise, "");
        assert!(prompt.contains("箇条書き"));
        assert!(prompt.contains("だ・である"));
    }

    #[test]
    fn english_tone_is_in_english() {
        let prompt = compose(BASE, ToneKey::English, "");
        assert!(prompt.contains("English"));
        assert!(prompt.contains("Professional"));
    }

    #[test]
    fn enthusiastic_tone_is_included() {
        let prompt = compose(BASE, ToneKey::Enthusiastic, "");
        assert!(prompt.contains("熱血"));
        assert!(prompt.contains("前向き"));
    }

    #[test]
    fn custom_instructions_are_appended_verbatim() {
        let prompt = compose(BASE, ToneKey::Professional, "専門用語を使ってください");
        assert!(prompt.contains(CUSTOM_INSTRUCTIONS_HEADING));
        assert!(prompt.ends_with("専門用語を使ってください"));
    }

    #[test]
    fn whitespace_only_custom_instructions_are_dropped() {
        let prompt = compose(BASE, ToneKey::Professional, "  \n\t ");
        assert!(!prompt.contains(CUSTOM_INSTRUCTIONS_HEADING));
    }

    #[test]
    fn unregistered_levels_use_level_three() {
        assert_eq!(base_instruction(0), base_instruction(3));
        assert_eq!(base_instruction(9), base_instruction(3));
        assert_ne!(base_instruction(5), base_instruction(3));
    }

    #[test]
    fn every_tone_has_an_instruction_block() {
        for tone in ToneKey::ALL {
            assert!(!tone_instruction(tone).is_empty());
        }
    }

    #[test]
    fn english_language_adds_output_directive_unless_tone_is_english() {
        let prefs = AiPreferences::new(ToneKey::Concise).with_language(Language::En);
        assert!(report_prompt("memo", None, &[], Some(&prefs)).contains(ENGLISH_OUTPUT_DIRECTIVE));

        let prefs = AiPreferences::new(ToneKey::English).with_language(Language::En);
        assert!(!report_prompt("memo", None, &[], Some(&prefs)).contains(ENGLISH_OUTPUT_DIRECTIVE));
    }

    #[test]
    fn report_prompt_without_preferences_uses_bare_base_instruction() {
        let prompt = report_prompt("memo", PolitenessLevel::new(4).ok(), &[], None);
        assert!(prompt.starts_with(&base_instruction(4)));
        assert!(!prompt.contains("### トーン"));
    }

    fn report_on(day: u32, logs: Vec<WorkLog>) -> DailyReport {
        DailyReport {
            id: ReportId::new(),
            tenant_id: TenantId::new(),
            user_id: UserId::new(),
            report_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            content_raw: format!("notes for day {day}"),
            content_polished: None,
            subject: Some(format!("日報 1/{day}")),
            politeness_level: PolitenessLevel::DEFAULT,
            work_logs: logs,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn weekly_prompt_lists_days_and_totals_hours_per_task() {
        let api = TaskId::new();
        let ui = TaskId::new();
        let reports = vec![
            report_on(8, vec![WorkLog {
                task_id: api,
                hours: 3.0,
                task_title: Some("API実装".into()),
            }]),
            report_on(9, vec![
                WorkLog { task_id: api, hours: 2.5, task_title: Some("API実装".into()) },
                WorkLog { task_id: ui, hours: 1.0, task_title: None },
            ]),
        ];

        let prompt = weekly_prompt(&reports, None);
        assert!(prompt.contains("対象期間: 2024-01-08 〜 2024-01-09"));
        assert!(prompt.contains("#### 2024-01-08 日報 1/8\nnotes for day 8"));
        assert!(prompt.contains("- API実装: 5.5h"));
        assert!(prompt.contains(&format!("- {ui}: 1h")));
    }

    #[test]
    fn summed_hours_are_printed_without_float_noise() {
        let task = TaskId::new();
        let log = |hours| WorkLog { task_id: task, hours, task_title: Some("調査".into()) };
        let reports = vec![report_on(8, vec![log(0.1)]), report_on(9, vec![log(0.2)])];

        let prompt = weekly_prompt(&reports, None);
        assert!(prompt.contains("- 調査: 0.3h"));
        assert!(!prompt.contains("0.30000000000000004"));
        assert_eq!(format_hours(10.0), "10");
        assert_eq!(format_hours(1.25), "1.25");
    }

    proptest! {
        #[test]
        fn custom_block_present_iff_instructions_non_blank(
            tone_idx in 0usize..4,
            custom in "[ a-zA-Z0-9\\n]{0,24}",
        ) {
            let tone = ToneKey::ALL[tone_idx];
            let prompt = compose(BASE, tone, &custom);

            prop_assert!(prompt.contains(tone_instruction(tone)));
            if custom.trim().is_empty() {
                prop_assert!(!prompt.contains(CUSTOM_INSTRUCTIONS_HEADING));
            } else {
                prop_assert!(prompt.contains(CUSTOM_INSTRUCTIONS_HEADING));
                prop_assert!(prompt.contains(&custom));
            }
        }

        #[test]
        fn unknown_tone_keys_compose_like_professional(
            key in "[a-z_]{1,16}",
            custom in "[a-z ]{0,16}",
        ) {
            prop_assume!(
                !["professional", "concise", "english", "enthusiastic"].contains(&key.as_str())
            );
            prop_assert_eq!(
                compose_with_key(BASE, &key, &custom),
                compose(BASE, ToneKey::Professional, &custom)
            );
        }
    }
}
