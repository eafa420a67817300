use std::sync::OnceLock;

/// Points awarded per fully positive answer; the scale every question uses.
pub const POINTS_PER_QUESTION: u8 = 10;

/// A single selectable option with its score weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOption {
    pub label: &'static str,
    pub points: u8,
}

/// One of the fixed assessment questions. Ids are stable and used as answer
/// keys on the wire and in the CSV backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: u8,
    pub prompt: &'static str,
    pub options: [QuestionOption; 4],
}

/// The fixed, ordered question catalogue. Single source of truth for scoring
/// weights; must be identical wherever the engine runs to avoid score drift.
#[derive(Debug)]
pub struct Catalogue {
    questions: Vec<Question>,
}

impl Catalogue {
    /// Shared catalogue instance, built once per process.
    pub fn shared() -> &'static Catalogue {
        static CATALOGUE: OnceLock<Catalogue> = OnceLock::new();
        CATALOGUE.get_or_init(|| Catalogue {
            questions: build_questions(),
        })
    }

    pub fn question(&self, id: u8) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Highest achievable raw score: every question answered with the top option.
    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32 * u32::from(POINTS_PER_QUESTION)
    }
}

fn question(id: u8, prompt: &'static str, labels: [&'static str; 4]) -> Question {
    let points = [0, 3, 7, 10];
    let mut options = [QuestionOption {
        label: "",
        points: 0,
    }; 4];
    for (slot, (label, pts)) in options.iter_mut().zip(labels.into_iter().zip(points)) {
        *slot = QuestionOption {
            label,
            points: pts,
        };
    }
    Question {
        id,
        prompt,
        options,
    }
}

fn build_questions() -> Vec<Question> {
    vec![
        question(
            1,
            "Hoe vaak evalueert jullie organisatie het recruitment proces?",
            [
                "Nooit - we doen altijd hetzelfde",
                "Jaarlijks tijdens evaluaties",
                "Per kwartaal systematisch",
                "Maandelijks met data-analyse",
            ],
        ),
        question(
            2,
            "Beschikt jullie organisatie over een gestructureerd onboarding programma?",
            [
                "Geen onboarding - mensen zoeken het zelf uit",
                "Basis introductie van 1-2 dagen",
                "Gestructureerd 2-4 weken programma",
                "Volledig gepersonaliseerd 90-dagen traject",
            ],
        ),
        question(
            3,
            "Hoe meet jullie organisatie de effectiviteit van recruitment?",
            [
                "Helemaal niet - geen metingen",
                "Basis statistieken (aantal hires)",
                "KPI dashboard (TTH, CPH, kwaliteit)",
                "Advanced analytics met predictive insights",
            ],
        ),
        question(
            4,
            "Welke moderne recruitment tools gebruikt jullie organisatie?",
            [
                "Alleen traditionele methoden (advertenties)",
                "Basis job boards (Indeed, LinkedIn)",
                "ATS systeem + professional tools",
                "AI-powered recruitment suite + automation",
            ],
        ),
        question(
            5,
            "Hoe is de samenwerking tussen HR en hiring managers?",
            [
                "Minimale communicatie - ieder doet zijn ding",
                "Ad-hoc contact bij vacatures",
                "Reguliere meetings en afstemming",
                "Strategische partnership met gedeelde KPIs",
            ],
        ),
        question(
            6,
            "Hoe lang duurt jullie gemiddelde recruitment proces?",
            [
                "Meer dan 3 maanden",
                "2-3 maanden",
                "1-2 maanden",
                "Minder dan 1 maand",
            ],
        ),
        question(
            7,
            "Heeft jullie organisatie een duidelijke employer branding strategie?",
            [
                "Geen strategie - we hopen dat mensen ons vinden",
                "Basis company profile op LinkedIn",
                "Actieve employer branding campagnes",
                "Award-winning employer brand met meetbare impact",
            ],
        ),
        question(
            8,
            "Hoe goed zijn jullie recruitment processen gedocumenteerd?",
            [
                "Niet gedocumenteerd - kennis in hoofden",
                "Basis procedures op papier",
                "Gedetailleerde handleidingen en workflows",
                "Volledig geautomatiseerd met process flows",
            ],
        ),
        question(
            9,
            "Welk percentage van jullie vacatures wordt intern vervuld?",
            [
                "0-10% - we kijken nauwelijks intern",
                "10-25% - soms promoveren we intern",
                "25-40% - goede interne mobiliteit",
                "40%+ - excellent interne development",
            ],
        ),
        question(
            10,
            "Hoe vaak trainen jullie hiring managers in interview technieken?",
            [
                "Nooit - ze doen het op gevoel",
                "Bij aanstelling een keer",
                "Jaarlijks refresh trainingen",
                "Voortdurende ontwikkeling met coaching",
            ],
        ),
        question(
            11,
            "Gebruikt jullie organisatie data-driven recruitment decisions?",
            [
                "Alleen op gevoel en intuïtie",
                "Basis rapportage achteraf",
                "Data-informed beslissingen met dashboards",
                "Volledig data-driven met predictive analytics",
            ],
        ),
        question(
            12,
            "Hoe proactief is jullie talent acquisition strategie?",
            [
                "Alleen reactief - vacature -> zoeken",
                "Occasioneel proactief sourcing",
                "Strategisch proactief met talent pools",
                "Continue talent pipeline building",
            ],
        ),
        question(
            13,
            "Welke diversiteit & inclusie maatregelen zijn er in recruitment?",
            [
                "Geen specifieke maatregelen",
                "Basis awareness en goede intenties",
                "Actieve D&I strategie met doelen",
                "Geavanceerde D&I programma's met meetbare impact",
            ],
        ),
        question(
            14,
            "Hoe snel kunnen jullie reageren op urgente recruitment behoeften?",
            [
                "Weken tot maanden - traag proces",
                "1-2 weken met extra inspanning",
                "Binnen een week georganiseerd",
                "Binnen 24-48 uur actief",
            ],
        ),
        question(
            15,
            "Hoe goed is de candidate experience in jullie proces?",
            [
                "Geen focus op experience",
                "Basis communicatie en feedback",
                "Gestructureerde experience journey",
                "Premium candidate journey met NPS tracking",
            ],
        ),
        question(
            16,
            "Welke recruitment marketing strategieën gebruikt jullie organisatie?",
            [
                "Geen specifieke marketing",
                "Basic job postings op boards",
                "Multi-channel approach met content",
                "Geavanceerde recruitment marketing met ROI tracking",
            ],
        ),
        question(
            17,
            "Hoe effectief is jullie employee referral programma?",
            [
                "Geen referral programma",
                "Informeel referral systeem",
                "Gestructureerd referral programma met incentives",
                "High-performance referral systeem (>30% hires)",
            ],
        ),
        question(
            18,
            "Hoe goed wordt de cultural fit geëvalueerd tijdens recruitment?",
            [
                "Geen culture fit evaluatie",
                "Basis gesprek over waarden",
                "Gestructureerde culture fit assessment",
                "Geavanceerde culture matching met tools",
            ],
        ),
        question(
            19,
            "Welke technologie wordt gebruikt voor candidate screening?",
            [
                "Handmatige screening van CV's",
                "Basic filtering tools",
                "Automated screening software",
                "AI-powered screening platform met bias detection",
            ],
        ),
        question(
            20,
            "Hoe wordt feedback verzameld van kandidaten na het proces?",
            [
                "Geen feedback verzameling",
                "Occasionele feedback vragen",
                "Systematische feedback surveys",
                "Real-time feedback en analytics met actieplannen",
            ],
        ),
        question(
            21,
            "Hoe effectief is de talent pool management?",
            [
                "Geen talent pool - altijd opnieuw zoeken",
                "Basic contact database",
                "Georganiseerde talent pool met segmentatie",
                "Dynamic talent community met engagement",
            ],
        ),
        question(
            22,
            "Welke assessment methoden worden gebruikt voor skills evaluatie?",
            [
                "Alleen interview gesprekken",
                "Basic skills vragen tijdens interview",
                "Gestructureerde competentie tests",
                "Geavanceerde assessment center met simulations",
            ],
        ),
        question(
            23,
            "Hoe wordt de recruitment ROI gemeten en geoptimaliseerd?",
            [
                "Geen ROI tracking",
                "Basic cost-per-hire berekeningen",
                "Uitgebreide ROI analytics per channel",
                "Predictive ROI optimization met business impact",
            ],
        ),
        question(
            24,
            "Hoe goed is de communicatie met kandidaten tijdens het proces?",
            [
                "Minimale communicatie",
                "Standard status updates",
                "Proactieve communicatie met timelines",
                "Personalized candidate journey met real-time updates",
            ],
        ),
        question(
            25,
            "Welke social media strategieën worden gebruikt voor recruitment?",
            [
                "Geen social media gebruik",
                "Basic LinkedIn posting",
                "Multi-platform social recruiting",
                "Advanced social media recruitment met influencer strategy",
            ],
        ),
        question(
            26,
            "Hoe effectief is de salary benchmarking en compensation strategy?",
            [
                "Geen benchmarking - gissing",
                "Basis markt onderzoek per jaar",
                "Regelmatige benchmarking met tools",
                "Dynamic compensation intelligence met real-time data",
            ],
        ),
        question(
            27,
            "Welke video interviewing en remote assessment tools worden gebruikt?",
            [
                "Alleen face-to-face interviews",
                "Basic video calling (Teams/Zoom)",
                "Professionele video interview platform",
                "AI-enhanced video assessment met analysis",
            ],
        ),
        question(
            28,
            "Hoe goed wordt er samengewerkt met external recruitment partners?",
            [
                "Geen externe partners",
                "Ad-hoc recruitment bureaus",
                "Strategische partnerships met SLA's",
                "Integrated recruitment ecosystem met data sharing",
            ],
        ),
        question(
            29,
            "Welke continuous improvement processen zijn er voor recruitment?",
            [
                "Geen improvement proces",
                "Jaarlijkse review en aanpassingen",
                "Kwartaal optimalisaties met data",
                "Continuous optimization cycle met innovation lab",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_has_twenty_nine_questions_with_stable_ids() {
        let catalogue = Catalogue::shared();
        assert_eq!(catalogue.len(), 29);
        assert_eq!(catalogue.max_score(), 290);

        let ids: HashSet<u8> = catalogue.questions().iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 29, "question ids must be unique");
        for (index, q) in catalogue.questions().iter().enumerate() {
            assert_eq!(usize::from(q.id), index + 1, "ids follow catalogue order");
        }
    }

    #[test]
    fn every_question_uses_the_fixed_point_scale() {
        for q in Catalogue::shared().questions() {
            let points: Vec<u8> = q.options.iter().map(|o| o.points).collect();
            assert_eq!(points, vec![0, 3, 7, 10], "question {} off scale", q.id);
            assert!(q.options.iter().all(|o| !o.label.is_empty()));
            assert!(!q.prompt.is_empty());
        }
    }

    #[test]
    fn lookup_by_id() {
        let catalogue = Catalogue::shared();
        let q = catalogue.question(6).expect("question 6 exists");
        assert!(q.prompt.contains("recruitment proces"));
        assert!(catalogue.question(0).is_none());
        assert!(catalogue.question(30).is_none());
    }
}
