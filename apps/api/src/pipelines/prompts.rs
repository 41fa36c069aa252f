// Prompt templates for the five pipelines.
// `{resume_text}` and `{candidate_context}` are replaced before sending.

pub const RESUME_EXTRACTION_PROMPT: &str = r#"Extract the candidate's details from the following resume content.

Return the candidate's full name, every education entry (institution, degree,
start_date, end_date), every work experience entry (company, role, start_date,
end_date, responsibilities) and a flat list of skills. Use the dates exactly as
written in the resume; use an empty string when a date is absent.

RESUME CONTENT:
{resume_text}"#;

pub const SKILL_GAP_PROMPT: &str = r#"You are an expert career coach. Analyze the following candidate and job description.

{candidate_context}

Identify at least 3 skill gaps. Give a concise but comprehensive description of each skill gap
in reference to the candidate's resume as well as the job description. Provide specific
recommendations on how to address each skill gap. Ensure that each skill gap, description and
recommendation is specific, actionable, and directly relevant to both the job description and
the candidate's resume."#;

pub const LEARNING_PATHWAY_PROMPT: &str = r#"You are an expert career coach. Analyze the following candidate and job description.

{candidate_context}

Identify at least 5 highly relevant resources to help bridge the candidate's skill gaps.
For each resource provide:
- a clear title (resource_name),
- a direct link,
- a concise yet informative summary of the content and how it addresses specific requirements
  in the job description and the candidate's skill gaps.
Each summary must highlight the resource's relevance to skills essential for success in this role."#;

pub const INTERVIEW_QUESTIONS_PROMPT: &str = r#"You are a highly experienced interviewer for the hiring company. Based on the following candidate and job description:

{candidate_context}

Craft 10 targeted interview questions. Focus on assessing the candidate's technical skills,
problem-solving abilities, and alignment with the company's culture and values. Each question
must be concise, specific, and directly relevant to both the role and the candidate's experience,
allowing them to demonstrate their qualifications and cultural fit."#;

pub const COVER_LETTER_PROMPT: &str = r#"You are an expert cover letter writer. Compose a professional cover letter based on the following candidate and job description:

{candidate_context}

Follow this structure:
1. Greeting: for example, 'To whom it may concern,'
2. Introduction: a brief introduction expressing enthusiasm for the role and a short pitch as to
   why the candidate is well-suited for it.
3. Body: emphasize key experiences that align with the job requirements. Highlight relevant
   skills that demonstrate the candidate's qualifications. Mention a notable achievement or
   project that shows concrete impact.
4. Conclusion: reaffirm interest in the role, encourage further discussion, and close
   professionally.
Keep the letter engaging and no more than 500 words. Use clear language and structured bullet
points for readability."#;

pub fn resume_prompt(resume_text: &str) -> String {
    RESUME_EXTRACTION_PROMPT.replace("{resume_text}", resume_text)
}

pub fn with_context(template: &str, candidate_context: &str) -> String {
    template.replace("{candidate_context}", candidate_context)
}
