//! Patient instruction documents.
//!
//! A [`DocumentRenderer`] turns a finished `Schedule` into one document in
//! one language. The schedule already satisfies every ordering and offset
//! invariant, so renderers only lay text out. A renderer either returns the
//! whole document or an error, never a partial one.

use crate::error::RenderError;
use crate::text::Language;
use crate::timeline::{timeline, TimelineKind};
use crate::Schedule;
use chrono::TimeZone;
use std::fmt::{self, Write};

/// A finished document ready to save or send
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedDocument {
    pub language: Language,
    pub content_type: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Something that can lay a schedule out as a document
pub trait DocumentRenderer {
    fn render<Tz: TimeZone>(
        &self,
        schedule: &Schedule<Tz>,
        lang: Language,
    ) -> Result<RenderedDocument, RenderError>
    where
        Tz::Offset: fmt::Display;
}

/// Render one document per language, or fail as a whole
pub fn render_all<R, Tz>(
    renderer: &R,
    schedule: &Schedule<Tz>,
    languages: &[Language],
) -> Result<Vec<RenderedDocument>, RenderError>
where
    R: DocumentRenderer,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    languages
        .iter()
        .map(|lang| renderer.render(schedule, *lang))
        .collect()
}

/// `SPMC_Schedule_<name>_<lang>.<ext>`, with each whitespace character in the
/// name replaced by `_`
pub fn document_file_name(patient_name: &str, lang: Language, extension: &str) -> String {
    let name: String = patient_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("SPMC_Schedule_{}_{}.{}", name, lang.code(), extension)
}

// ============================================================================
// Plain-text instruction sheet
// ============================================================================

/// Fixed clinical instruction text for one language
struct Sheet {
    product: &'static str,
    scheduled_for: &'static str,
    date: &'static str,
    name: &'static str,
    time: &'static str,
    instructions_title: &'static str,
    toilet_note: &'static str,
    cleansing_note: &'static str,
    prepare_title: &'static str,
    steps: [&'static str; 5],
    take_sachet: &'static str,
    drink_after: &'static str,
    clear_fluids: &'static str,
    qa_title: &'static str,
    qa: [(&'static str, &'static str); 3],
    question: &'static str,
    answer: &'static str,
    note: &'static str,
}

static EN_SHEET: Sheet = Sheet {
    product: "SODIUM PICOSULPHATE: 10 MG, MAGNESIUM (AS MAGNESIUM OXIDE LIGHT): 3.5 G, \
              CITRIC ACID ANHYDROUS: 10.97 G (SPMC) POWDER FOR SOLUTION",
    scheduled_for: "Your procedure is scheduled for:",
    date: "Date",
    name: "Name",
    time: "Time",
    instructions_title: "SPMC Patient Instructions",
    toilet_note: "You will need to be near a toilet after you take this medicine as it can \
                  start working within 1 to 3 hours.",
    cleansing_note: "In order for your doctor to see the colon lining clearly, your colon must \
                     be adequately cleansed. This is greatly increasing the accuracy of the \
                     procedure to ensure thorough examination and to avoid the need for \
                     repeating it.",
    prepare_title: "HOW TO PREPARE & TAKE SPMC:",
    steps: [
        "Fill a cup with 150ml cold water.",
        "Empty contents of one sachet in the cup.",
        "Stir for 2 to 3 minutes until completely dissolved (mixture may heat up - allow to \
         cool - then drink the mixture).",
        "Take SPMC according to the following schedule.",
        "The time elapsed between the sachets should be at least 3-4 hours.",
    ],
    take_sachet: "Take 1 sachet of SPMC",
    drink_after: "Should drink 1L of water or clear fluid after each preparation",
    clear_fluids: "*Clear Fluids: Water, Clean Power drinks, apple juice, ginger ale, Sprite, \
                   7up, Soup. Do not drink liquids that you can't see through.",
    qa_title: "Q & A TO MAXIMIZE BOWEL CLEANSING SUCCESS:",
    qa: [
        (
            "Why do I have to drink 1.5 to 2 litres of clear fluids after each sachet?",
            "Drinking clear fluids helps to: optimise bowel cleansing; avoid dehydration.",
        ),
        (
            "How long does it take for SPMC to start working?",
            "This varies depending on each individual but usually within 3 hours.",
        ),
        (
            "Are there any other dietary considerations I should take into account?",
            "Following your Doctor's advice prior to your procedure, AVOID the following as \
             they leave digestive residue: seeds and nuts; fresh fruits or vegetables; \
             multigrain bread.",
        ),
    ],
    question: "Q",
    answer: "A",
    note: "Note:",
};

static AR_SHEET: Sheet = Sheet {
    product: "صوديوم بيكوسلفات: 10 مجم، ماغنيسيوم (أكسيد الماغنيسيوم الخفيف): 3.5 جم، \
              حمض الستريك اللامائي: 10.97 جم (SPMC) مسحوق للحل",
    scheduled_for: "موعد إجراء العملية:",
    date: "التاريخ",
    name: "اسم",
    time: "الوقت",
    instructions_title: "SPMC تعليمات المريض",
    toilet_note: "ستحتاج إلى أن تكون بالقرب من المرحاض بعد تناول هذا الدواء حيث يمكن أن يبدأ \
                  مفعوله خلال 1 إلى 3 ساعات.",
    cleansing_note: "لكي يتمكن طبيبك من رؤية بطانة القولون بوضوح، يجب تنظيف القولون بشكل كافٍ. \
                     وهذا يزيد بشكل كبير من دقة الإجراء لضمان الفحص الشامل وتجنب الحاجة إلى \
                     تكراره.",
    prepare_title: "طريقة التحضير والاستخدام SPMC:",
    steps: [
        "املأ كوبًا بـ 150 مل من الماء البارد.",
        "أفرغ محتويات كيس واحد في الكوب.",
        "قلّب لمدة 2 إلى 3 دقائق حتى يذوب تمامًا (قد ترتفع درجة حرارة الخليط - اتركه ليبرد - \
         ثم اشرب الخليط).",
        "خذ SPMC وفقًا للجدول الزمني التالي.",
        "يجب أن يكون الوقت المنقضي بين الجرعات على الأقل 3-4 ساعات.",
    ],
    take_sachet: "خذ كيس واحد من SPMC",
    drink_after: "يجب شرب 1 لتر من الماء أو السوائل الصافية بعد كل جرعة",
    clear_fluids: "*السوائل الصافية: الماء، مشروبات الطاقة الصافية، عصير التفاح، الزنجبيل، \
                   سبرايت، سفن أب، الحساء. لا تشرب السوائل التي لا يمكنك الرؤية من خلالها.",
    qa_title: "أسئلة وأجوبة لتعزيز نجاح تنظيف الأمعاء:",
    qa: [
        (
            "لماذا يجب أن أشرب 1.5 إلى 2 لتر من السوائل الصافية بعد كل كيس؟",
            "شرب السوائل الصافية يساعد على: تحسين تنظيف الأمعاء؛ تجنب الجفاف.",
        ),
        (
            "كم من الوقت يستغرق SPMC لبدء العمل؟",
            "يختلف هذا حسب كل فرد ولكن عادةً خلال 3 ساعات.",
        ),
        (
            "هل هناك اعتبارات غذائية أخرى يجب أن آخذها في الاعتبار؟",
            "باتباع نصيحة طبيبك قبل الإجراء، تجنب الأطعمة التالية لأنها تترك بقايا هضمية: \
             البذور والمكسرات؛ الفواكه أو الخضروات الطازجة؛ الخبز متعدد الحبوب.",
        ),
    ],
    question: "س",
    answer: "ج",
    note: "ملاحظة:",
};

fn sheet(lang: Language) -> &'static Sheet {
    match lang {
        Language::En => &EN_SHEET,
        Language::Ar => &AR_SHEET,
    }
}

/// Right-to-left mark, so plain-text viewers start Arabic lines on the right
const RLM: &str = "\u{200F}";

/// Lays the instruction sheet out as UTF-8 text
#[derive(Clone, Debug, Default)]
pub struct TextDocumentRenderer;

impl TextDocumentRenderer {
    pub const CONTENT_TYPE: &'static str = "text/plain; charset=utf-8";
    pub const EXTENSION: &'static str = "txt";

    fn write_sheet<Tz: TimeZone>(
        out: &mut String,
        schedule: &Schedule<Tz>,
        lang: Language,
    ) -> fmt::Result
    where
        Tz::Offset: fmt::Display,
    {
        let text = sheet(lang);
        let labels = lang.labels();
        let procedure = schedule.procedure_date_time();
        let rule = "=".repeat(72);

        writeln!(out, "{}", text.product)?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "{} - {}", labels.title, schedule.patient_name())?;
        writeln!(out)?;
        writeln!(out, "{}", text.scheduled_for)?;
        writeln!(out, "  {}: {}", text.date, lang.format_date(procedure))?;
        writeln!(out, "  {}: {}", text.name, schedule.patient_name())?;
        writeln!(out, "  {}: {}", text.time, lang.format_time(procedure))?;
        writeln!(out)?;
        writeln!(out, "{}", text.instructions_title)?;
        writeln!(out, "  {}", text.toilet_note)?;
        writeln!(out)?;
        writeln!(out, "{}", text.cleansing_note)?;
        writeln!(out)?;
        writeln!(out, "{}", text.prepare_title)?;
        for (i, step) in text.steps.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, step)?;
        }
        writeln!(out)?;

        for entry in timeline(schedule) {
            let when = lang.format_instant(&entry.at);
            match entry.kind {
                TimelineKind::Dose(_) => writeln!(
                    out,
                    "| {} | {} | {} | {} |",
                    entry.title(lang),
                    when,
                    text.take_sachet,
                    text.drink_after
                )?,
                _ => writeln!(
                    out,
                    "| {} | {} | {} |",
                    entry.title(lang),
                    when,
                    entry.description(lang)
                )?,
            }
        }
        writeln!(out)?;
        writeln!(out, "{}", text.clear_fluids)?;
        writeln!(out)?;
        writeln!(out, "{}", text.qa_title)?;
        for (question, answer) in text.qa.iter() {
            writeln!(out, "  {}: {}", text.question, question)?;
            writeln!(out, "  {}: {}", text.answer, answer)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", text.note)?;
        for _ in 0..3 {
            writeln!(out, "{}", "_".repeat(72))?;
        }
        writeln!(out)?;
        writeln!(out, "{}", labels.footer)?;
        Ok(())
    }
}

impl DocumentRenderer for TextDocumentRenderer {
    fn render<Tz: TimeZone>(
        &self,
        schedule: &Schedule<Tz>,
        lang: Language,
    ) -> Result<RenderedDocument, RenderError>
    where
        Tz::Offset: fmt::Display,
    {
        let mut body = String::new();
        Self::write_sheet(&mut body, schedule, lang)
            .map_err(|e| RenderError::Template(e.to_string()))?;

        if lang.is_rtl() {
            body = body
                .lines()
                .map(|line| format!("{}{}\n", RLM, line))
                .collect();
        }

        tracing::debug!(
            lang = %lang,
            bytes = body.len(),
            "Rendered text instruction sheet"
        );

        Ok(RenderedDocument {
            language: lang,
            content_type: Self::CONTENT_TYPE,
            file_name: document_file_name(schedule.patient_name(), lang, Self::EXTENSION),
            bytes: body.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calculate_schedule, SachetCount, ScheduleInput};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn schedule() -> Schedule<Utc> {
        let input = ScheduleInput::new(
            "Jane  Doe",
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            SachetCount::Three,
        )
        .unwrap();
        calculate_schedule(&input, &Utc)
    }

    fn body(doc: &RenderedDocument) -> String {
        String::from_utf8(doc.bytes.clone()).unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            document_file_name("Jane  Doe", Language::Ar, "pdf"),
            "SPMC_Schedule_Jane__Doe_ar.pdf"
        );
        assert_eq!(
            document_file_name("Jane\tDoe", Language::En, "txt"),
            "SPMC_Schedule_Jane_Doe_en.txt"
        );
    }

    #[test]
    fn test_english_sheet() {
        let doc = TextDocumentRenderer.render(&schedule(), Language::En).unwrap();
        assert_eq!(doc.content_type, TextDocumentRenderer::CONTENT_TYPE);
        assert_eq!(doc.file_name, "SPMC_Schedule_Jane__Doe_en.txt");

        let text = body(&doc);
        assert_eq!(text.matches("Take 1 sachet of SPMC").count(), 3);
        assert!(text.contains("Date: June 10th, 2025"));
        assert!(text.contains("Time: 2:00 PM"));
        assert!(text.contains("| Dose 1 | Tuesday, June 10th at 3:00 AM |"));
        assert!(text.contains("| Last Meal | Tuesday, June 10th at 12:00 AM |"));
        assert!(text.ends_with("Always follow your doctor's instructions.\n"));
    }

    #[test]
    fn test_arabic_sheet() {
        let doc = TextDocumentRenderer.render(&schedule(), Language::Ar).unwrap();
        let text = body(&doc);
        assert_eq!(text.matches("خذ كيس واحد من SPMC").count(), 3);
        assert!(text.contains("آخر وجبة"));
        assert!(text.lines().all(|line| line.starts_with(RLM)));
    }

    #[test]
    fn test_render_all_languages() {
        let docs = render_all(&TextDocumentRenderer, &schedule(), &Language::ALL).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].language, Language::En);
        assert_eq!(docs[1].language, Language::Ar);
    }
}
