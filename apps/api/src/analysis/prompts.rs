// All prompt templates for the analysis endpoints.
// Placeholders are replaced verbatim; see the builder functions next to each result type.

/// Roadmap prompt. Replace: {role}, {location}, {current_level}, {goal}, {difficulty}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Act as a Senior Career Data Scientist and Technical Recruiter. Analyze the role of "{role}" in "{location}" (Context: Level "{current_level}", Goal "{goal}", Complexity "{difficulty}").

Task: Provide a highly detailed, accurate, and technical market analysis in RAW JSON format.

COMPLEXITY ("{difficulty}"):
- "Beginner": core fundamentals, simplified concepts, essential starting tools, approachable learning resources.
- "Intermediate": standard industry practices, production workflows, breadth of knowledge, common frameworks.
- "Advanced": deep internals, architectural patterns, performance optimization, scalability, expert-level nuance.

ACCURACY:
- Avoid generic terms. Be specific (instead of "Cloud", say "AWS Lambda & Step Functions"; instead of "AI", say "Transformer Architectures & LLM Fine-tuning").
- Focus on high-value skills relevant to the requested complexity.

CURRENCY:
1. Detect the local currency for "{location}" (e.g. India = INR, UK = GBP, Europe = EUR, Japan = JPY).
2. ALL salary numbers (salaryTrends, salaryRange) MUST be in this LOCAL currency.
3. DO NOT convert to USD. Return the raw local market values.

Structure requirements:
1. currency: { "symbol": "₹", "code": "INR" } adapted to the location.
2. salaryTrends: EXACTLY 5 points labelled "Entry", "Junior", "Mid-Level", "Senior", "Principal/Lead" with numeric local-currency values.
3. hotTopics: the top 8-10 specific technical topics/frameworks with an interview 'probability' (0-100).
4. skillsGap: compare {current_level} vs {goal}. 4 "missing" skills (technical and architectural) and 4 "mastery" areas to leverage.
5. certifications: 4 high-value certifications with "name" and "provider".
6. resumeTips: 3 specific, high-impact CV optimizations.
7. steps: a 3-4 phase execution plan. EACH action item is an object { "text": "...", "type": "Technical" | "Resource" | "Project" }.
8. trendComparison:
   - "globalTrend": 30-40 word analysis of the global trend.
   - "localTrend": 30-40 word analysis of the local market reality.
   - "adoptionLag": 2-3 sentences on the technology adoption lag versus global hubs.
   - "salaryArbitrage": 2-3 sentences comparing purchasing power and salary difference.
   - "globalSalaryBenchmark": total compensation RANGE (base + bonus + stock) in USD in a tier-1 hub, formatted "$Min - $Max USD".
   - "relocationSuggestion": the single best country for this role/stack to maximize earnings and savings.
   - "localLivingCost": monthly living expenses for a single person in {location} plus approximate income tax, e.g. "Rent: ₹30k, Food: ₹12k, Transport: ₹5k, Tax: ~30%".
   - "localBenefits": standard benefits in {location} for this role (bonus, health insurance, stock options, perks).
   - "globalTech": 3 technologies hot globally but rare locally.
   - "localTech": 3 technologies still dominant locally.

JSON Structure:
{
  "roleSummary": "Executive summary...",
  "marketOutlook": "High Growth",
  "currency": { "symbol": "₹", "code": "INR" },
  "salaryRange": "₹12L - ₹25L",
  "salaryTrends": [
    { "label": "Entry", "value": 800000 },
    { "label": "Junior", "value": 1200000 },
    { "label": "Mid-Level", "value": 1800000 },
    { "label": "Senior", "value": 2800000 },
    { "label": "Principal/Lead", "value": 4500000 }
  ],
  "hotTopics": [ { "topic": "System Design", "probability": 90 } ],
  "growthTimeline": [ { "role": "Senior", "years": "2-3y" } ],
  "skillsGap": {
    "missing": ["Advanced Kubernetes Operators", "Event-Driven Microservices"],
    "mastery": ["Python Optimization", "SQL Performance Tuning"]
  },
  "certifications": [ { "name": "AWS Certified Solutions Architect - Professional", "provider": "Amazon" } ],
  "resumeTips": ["Quantify impact..."],
  "steps": [
    {
      "phase": "Phase 1: Advanced Skill Deepening",
      "duration": "3 Months",
      "description": "Focus on solidifying advanced concepts...",
      "actionItems": [
        { "text": "Master distributed system patterns", "type": "Technical" },
        { "text": "Read 'Designing Data-Intensive Applications'", "type": "Resource" },
        { "text": "Build a real-time recommendation engine", "type": "Project" }
      ],
      "tools": ["Kafka", "Airflow"]
    }
  ],
  "trendComparison": {
    "globalTrend": "Shift towards agentic workflows...",
    "localTrend": "Heavy focus on data engineering foundations...",
    "adoptionLag": "Local market trails by 6-9 months...",
    "salaryArbitrage": "Local salaries are 30% of the US equivalent...",
    "globalSalaryBenchmark": "$150,000 - $220,000 USD",
    "relocationSuggestion": "United States",
    "localLivingCost": "Rent: ₹35k, Food: ₹15k, Transport: ₹5k, Tax: ~30%",
    "localBenefits": "Health Insurance (Family), ESOPs (Vest 4y), Annual Bonus (15%)",
    "globalTech": ["LangGraph", "Rust", "Vector DBs"],
    "localTech": ["Java Spring Boot", "Legacy SQL", "Jenkins"]
  }
}"#;

/// Local ecosystem prompt. Replace: {role}, {location}
pub const INSIGHTS_PROMPT_TEMPLATE: &str = r#"Analyze the local tech ecosystem for a "{role}" in "{location}".

Task:
1. Identify EXACTLY 21 specific active companies in this region hiring for similar roles.
2. Classify them strictly into 'Global Titan' (7), 'National Leader' (7) and 'Startup' (7).
3. Provide 'topCities' (top 10 cities) and 'topStates' (top 10 states/regions).
   For each city/state estimate 'demand' (High/Medium/Low) and 'salary' (average, as a string).

REQUIREMENTS:
- Keep descriptions extremely concise (under 10 words).
- Provide a concise 'cultureVibe' (1-2 words), e.g. 'Innovative'.
- Provide the official 'website' URL (homepage).
- Provide a 'linkedin' company page URL if available, otherwise null.

Return RAW JSON:
{
  "topCompanies": [
    {
      "name": "Name",
      "category": "Global Titan",
      "description": "Short bio",
      "cultureVibe": "Innovative",
      "website": "https://...",
      "linkedin": "https://linkedin.com/company/..."
    }
  ],
  "topCities": [ { "location": "City Name", "salary": "Avg String", "demand": "High" } ],
  "topStates": [ { "location": "State Name", "salary": "Avg String", "demand": "Medium" } ]
}"#;

/// Positioning prompt.
/// Replace: {role}, {location}, {current_level}, {goal}, {experience_level},
///          {education}, {skills}, {experience}
pub const POSITIONING_PROMPT_TEMPLATE: &str = r#"Act as a Strategic Career Advisor.
Analyze the specific profile for a {role} role in {location}.

CANDIDATE PROFILE:
- Current Level: {current_level}
- Experience Duration: {experience_level}
- Goal: {goal}
- Degree: {education}
- Technical Skills: {skills}
- Work History / Internships: {experience}

Task: Calculate a "Strategic Fit Score" (0-100).

Output requirements:
1. readinessScore (0-100).
2. keyStrengths: 3-4 short, punchy strings (e.g. "Top-Tier Degree", "ML Frameworks").
3. growthAreas: 3-4 short, punchy strings (e.g. "Cloud Native", "Team Leadership").
4. verdict: a detailed analysis in 2-3 short paragraphs. Use markdown bold (**Text**) for key skills and points.
5. hiringCompanies: EXACTLY 12 companies in {location} that fit this profile.

Return RAW JSON:
{
  "readinessScore": 85,
  "keyStrengths": ["Academic Rigor", "Python Proficiency", "Big Tech Exposure"],
  "growthAreas": ["Cloud Deployments", "System Design", "MLOps"],
  "scoreBreakdown": {
    "locationFit": 90,
    "roleDemand": 85,
    "goalFeasibility": 80
  },
  "verdict": "Detailed verdict using **markdown bold**...",
  "topSectors": ["Fintech", "HealthTech", "Ecommerce"],
  "hiringCompanies": [
    {
      "name": "Company Name",
      "sector": "Sector",
      "matchLevel": "High",
      "hiringFocus": "Specific tech focus",
      "sectorSpecificFocus": "Concise (1-2 words) technology or trend, e.g. 'AI Diagnostics'",
      "cultureVibe": "Company culture",
      "rationale": "2-3 sentences on why this company fits, referencing the candidate's specific skills or experience."
    }
  ],
  "demandTrend": "Rising"
}"#;

/// Interview question prompt. Replace: {role}, {count}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Act as a Hiring Manager. Generate EXACTLY {count} strategic interview questions for a "{role}".
Mix Technical, System Design, and Behavioral questions.

Return a RAW JSON array of objects with "question", "type", "context" and "answer":
[
  {
    "question": "How would you design an idempotent ingestion pipeline?",
    "type": "System Design",
    "context": "Probes reliability thinking for data-heavy roles.",
    "answer": "A strong answer covers deduplication keys, exactly-once sinks and replay."
  }
]"#;
