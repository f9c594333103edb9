// src/generation/prompts.rs
use serde::Serialize;

use crate::job_extraction::JobDetails;
use crate::types::{FitAnalysis, Profile};

pub const ANALYSIS_SYSTEM: &str = "You are an expert at matching candidate profiles with job requirements. Extract the key insights needed to write a tailored CV and cover letter.";

pub const CV_SYSTEM: &str = "You are a professional CV writer who tailors CVs to specific job descriptions. You write clean, ATS-friendly CVs that put relevant experience and skills first.";

pub const COVER_LETTER_SYSTEM: &str = "You are a professional cover letter writer. Your letters are engaging, tailored to the specific role, highlight relevant qualifications and show genuine interest in the position.";

pub const DEFAULT_TONE: &str = "professional but personable";

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn analysis_prompt(profile: &Profile, job: &JobDetails) -> String {
    format!(
        r#"Analyze the candidate profile and job description below and identify the strongest matches to highlight.

Candidate Profile:
{profile}

Job Description:
{job}

Return a JSON object with exactly these fields:
{{
  "keySkills": ["candidate skills that match the job requirements"],
  "relevantExperience": ["experience points worth highlighting"],
  "missingSkills": ["skills the job asks for that the candidate may lack"],
  "suggestedTone": "formal, conversational, ... based on the company culture",
  "focusAreas": ["what the CV and cover letter should emphasize"]
}}"#,
        profile = pretty(profile),
        job = pretty(job),
    )
}

pub fn cv_prompt(profile: &Profile, job: &JobDetails, analysis: &FitAnalysis) -> String {
    format!(
        r#"Output only the CV text, with no JSON and no commentary.

Write a professional CV for this job application.

Candidate Profile:
{profile}

Job Description:
{job}

Key matches and strengths from the analysis:
{analysis}

Tailor the CV to the candidate's most relevant experience and skills for this job.
Use clear sections for contact information, professional summary, work experience, education and skills, plus any other relevant section.
Lead with achievements and responsibilities that match the job requirements, and emphasize the key skills from the analysis.
Keep the structure simple enough to be laid out as a document."#,
        profile = pretty(profile),
        job = pretty(job),
        analysis = pretty(analysis),
    )
}

pub fn cover_letter_prompt(profile: &Profile, job: &JobDetails, analysis: &FitAnalysis) -> String {
    let tone = analysis
        .suggested_tone
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TONE);

    format!(
        r#"Output only the cover letter text, with no JSON and no commentary.

Write a cover letter for this job application.

Candidate Profile:
{profile}

Job Description:
{job}

Key matches and strengths from the analysis:
{analysis}

Introduce the candidate, highlight the experience and skills that matter for this job, explain the interest in the role and the company, and close with a call to action.
The tone should be {tone}.
Address any skill gaps from the analysis in a positive way."#,
        profile = pretty(profile),
        job = pretty(job),
        analysis = pretty(analysis),
        tone = tone,
    )
}
