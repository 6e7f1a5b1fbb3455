//! Seed data for the in-memory store.
//!
//! Demo accounts, the two intake questionnaires, sample responses and
//! December events, plus the pre-computed analytics aggregates.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::form;
use crate::models::{
    AnalyticsData, AnswerValue, ApprenticeAnalytics, ConditionalRule, DailyUsers,
    EngagementAnalytics, Event, EventAnalytics, EventAttendees, EventReminders, EventStatus,
    EventType, EventTypeStats, MonthlyEvents, MonthlyResponses, ProgressBucket, Question,
    QuestionOption, QuestionType, Questionnaire, QuestionnaireAnalytics, QuestionnaireCategory,
    QuestionnaireResponse, QuestionnaireStatus, QuestionnaireTypeStats, RegionCount, ResponseStatus,
    Role, ShowWhen, StatusCount, TargetRole, User, ValidationRules,
};

fn ts(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .expect("valid seed timestamp")
}

fn option(id: &str, label: &str) -> QuestionOption {
    QuestionOption {
        id: id.to_string(),
        label: label.to_string(),
        value: id.to_string(),
    }
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            email: "apprentice@btpcfa.fr".to_string(),
            name: "Marie Dubois".to_string(),
            role: Role::Apprentice,
            avatar: None,
            created_at: ts(2024, 1, 15, 0, 0),
            last_login: None,
        },
        User {
            id: "2".to_string(),
            email: "ssp@btpcfa.fr".to_string(),
            name: "Jean Martin".to_string(),
            role: Role::Ssp,
            avatar: None,
            created_at: ts(2023, 9, 1, 0, 0),
            last_login: None,
        },
        User {
            id: "3".to_string(),
            email: "admin@btpcfa.fr".to_string(),
            name: "Sophie Laurent".to_string(),
            role: Role::Admin,
            avatar: None,
            created_at: ts(2023, 6, 1, 0, 0),
            last_login: None,
        },
    ]
}

pub fn questionnaires() -> Vec<Questionnaire> {
    vec![
        Questionnaire {
            id: "1".to_string(),
            title: "Questionnaire de pré-orientation".to_string(),
            description: "Évaluation initiale pour mieux comprendre vos objectifs et besoins"
                .to_string(),
            category: QuestionnaireCategory::PreGuidance,
            status: QuestionnaireStatus::Active,
            target_role: TargetRole::Apprentice,
            estimated_duration: 15,
            created_at: ts(2024, 1, 15, 0, 0),
            updated_at: ts(2024, 1, 15, 0, 0),
            created_by: "3".to_string(),
            questions: vec![
                Question {
                    id: "q1".to_string(),
                    question_type: QuestionType::Text,
                    title: "Quel est votre objectif principal pour cette formation ?".to_string(),
                    description: Some(
                        "Décrivez en quelques mots ce que vous espérez accomplir".to_string(),
                    ),
                    required: true,
                    options: None,
                    validation: None,
                    conditional_logic: None,
                },
                Question {
                    id: "q2".to_string(),
                    question_type: QuestionType::Select,
                    title: "Dans quel domaine souhaitez-vous vous spécialiser ?".to_string(),
                    description: None,
                    required: true,
                    options: Some(vec![
                        option("masonry", "Maçonnerie"),
                        option("electricity", "Électricité"),
                        option("plumbing", "Plomberie"),
                        option("carpentry", "Charpenterie"),
                        option("other", "Autre"),
                    ]),
                    validation: None,
                    conditional_logic: None,
                },
                Question {
                    id: "q3".to_string(),
                    question_type: QuestionType::Textarea,
                    title: "Si vous avez choisi 'Autre', précisez :".to_string(),
                    description: None,
                    required: false,
                    options: None,
                    validation: None,
                    conditional_logic: Some(ConditionalRule {
                        depends_on: "q2".to_string(),
                        show_when: ShowWhen::One("other".to_string()),
                    }),
                },
                Question {
                    id: "q4".to_string(),
                    question_type: QuestionType::Scale,
                    title: "Sur une échelle de 1 à 10, comment évaluez-vous votre motivation ?"
                        .to_string(),
                    description: None,
                    required: true,
                    options: None,
                    validation: Some(ValidationRules {
                        min: Some(1.0),
                        max: Some(10.0),
                        pattern: None,
                        message: None,
                    }),
                    conditional_logic: None,
                },
                Question {
                    id: "q5".to_string(),
                    question_type: QuestionType::Checkbox,
                    title: "Quels sont vos centres d'intérêt ? (plusieurs choix possibles)"
                        .to_string(),
                    description: None,
                    required: false,
                    options: Some(vec![
                        option("manual", "Travail manuel"),
                        option("technical", "Aspects techniques"),
                        option("team", "Travail en équipe"),
                        option("innovation", "Innovation et nouvelles technologies"),
                        option("management", "Management et encadrement"),
                    ]),
                    validation: None,
                    conditional_logic: None,
                },
            ],
        },
        Questionnaire {
            id: "2".to_string(),
            title: "Évaluation de situation personnelle".to_string(),
            description: "Questionnaire pour évaluer votre situation personnelle et identifier les besoins d'accompagnement"
                .to_string(),
            category: QuestionnaireCategory::PersonalSituation,
            status: QuestionnaireStatus::Active,
            target_role: TargetRole::Apprentice,
            estimated_duration: 20,
            created_at: ts(2024, 2, 1, 0, 0),
            updated_at: ts(2024, 2, 1, 0, 0),
            created_by: "2".to_string(),
            questions: vec![
                Question {
                    id: "p1".to_string(),
                    question_type: QuestionType::Radio,
                    title: "Quelle est votre situation de logement actuelle ?".to_string(),
                    description: None,
                    required: true,
                    options: Some(vec![
                        option("family", "Chez mes parents/famille"),
                        option("student", "Résidence étudiante"),
                        option("rental", "Location privée"),
                        option("other", "Autre"),
                    ]),
                    validation: None,
                    conditional_logic: None,
                },
                Question {
                    id: "p2".to_string(),
                    question_type: QuestionType::Radio,
                    title: "Avez-vous des difficultés financières ?".to_string(),
                    description: None,
                    required: true,
                    options: Some(vec![
                        option("none", "Aucune difficulté"),
                        option("minor", "Difficultés mineures"),
                        option("moderate", "Difficultés modérées"),
                        option("major", "Difficultés importantes"),
                    ]),
                    validation: None,
                    conditional_logic: None,
                },
                Question {
                    id: "p3".to_string(),
                    question_type: QuestionType::Checkbox,
                    title: "Dans quels domaines avez-vous besoin d'aide ? (plusieurs choix possibles)"
                        .to_string(),
                    description: None,
                    required: false,
                    options: Some(vec![
                        option("housing", "Logement"),
                        option("transport", "Transport"),
                        option("health", "Santé"),
                        option("finance", "Gestion financière"),
                        option("admin", "Démarches administratives"),
                    ]),
                    validation: None,
                    conditional_logic: None,
                },
            ],
        },
    ]
}

pub fn responses(questionnaires: &[Questionnaire]) -> Vec<QuestionnaireResponse> {
    let mut completed_answers: HashMap<String, AnswerValue> = HashMap::new();
    completed_answers.insert(
        "q1".to_string(),
        AnswerValue::Text(
            "Obtenir un diplôme reconnu et trouver un emploi stable dans le BTP".to_string(),
        ),
    );
    completed_answers.insert("q2".to_string(), AnswerValue::Text("masonry".to_string()));
    completed_answers.insert("q4".to_string(), AnswerValue::Number(8.0));
    completed_answers.insert(
        "q5".to_string(),
        AnswerValue::Multi(vec![
            "manual".to_string(),
            "technical".to_string(),
            "team".to_string(),
        ]),
    );

    let mut partial_answers: HashMap<String, AnswerValue> = HashMap::new();
    partial_answers.insert("p1".to_string(), AnswerValue::Text("family".to_string()));

    // Progress is derived, never hand-written, so the seeds go through the
    // same computation the save path uses.
    let progress = |questionnaire_id: &str, answers: &HashMap<String, AnswerValue>| {
        questionnaires
            .iter()
            .find(|q| q.id == questionnaire_id)
            .map(|q| form::calculate_progress(answers, &q.questions))
            .unwrap_or(0)
    };

    vec![
        QuestionnaireResponse {
            id: "r1".to_string(),
            questionnaire_id: "1".to_string(),
            user_id: "1".to_string(),
            status: ResponseStatus::Completed,
            progress: progress("1", &completed_answers),
            started_at: ts(2024, 12, 1, 10, 0),
            completed_at: Some(ts(2024, 12, 1, 10, 15)),
            last_saved_at: ts(2024, 12, 1, 10, 15),
            answers: completed_answers,
        },
        QuestionnaireResponse {
            id: "r2".to_string(),
            questionnaire_id: "2".to_string(),
            user_id: "1".to_string(),
            status: ResponseStatus::InProgress,
            progress: progress("2", &partial_answers),
            started_at: ts(2024, 12, 5, 14, 0),
            completed_at: None,
            last_saved_at: ts(2024, 12, 5, 14, 10),
            answers: partial_answers,
        },
    ]
}

pub fn events() -> Vec<Event> {
    vec![
        Event {
            id: "1".to_string(),
            title: "Entretien initial - Marie Dubois".to_string(),
            description: Some("Premier entretien de suivi socio-professionnel".to_string()),
            event_type: EventType::Interview,
            status: EventStatus::Scheduled,
            start_date: ts(2024, 12, 15, 10, 0),
            end_date: ts(2024, 12, 15, 11, 0),
            location: Some("Bureau 201".to_string()),
            is_virtual: false,
            meeting_link: None,
            attendees: EventAttendees {
                apprentice_id: Some("1".to_string()),
                ssp_id: Some("2".to_string()),
                admin_id: None,
                external_attendees: None,
            },
            created_by: "2".to_string(),
            created_at: ts(2024, 12, 10, 0, 0),
            updated_at: ts(2024, 12, 10, 0, 0),
            reminders: EventReminders {
                email: true,
                sms: true,
                push: true,
                reminder_time: 60,
            },
            notes: None,
        },
        Event {
            id: "2".to_string(),
            title: "Suivi mensuel - Marie Dubois".to_string(),
            description: Some("Point mensuel sur la progression".to_string()),
            event_type: EventType::FollowUp,
            status: EventStatus::Completed,
            start_date: ts(2024, 12, 12, 14, 0),
            end_date: ts(2024, 12, 12, 15, 0),
            location: Some("Visioconférence".to_string()),
            is_virtual: true,
            meeting_link: Some("https://meet.example.com/abc123".to_string()),
            attendees: EventAttendees {
                apprentice_id: Some("1".to_string()),
                ssp_id: Some("2".to_string()),
                admin_id: None,
                external_attendees: None,
            },
            created_by: "2".to_string(),
            created_at: ts(2024, 12, 5, 0, 0),
            updated_at: ts(2024, 12, 12, 0, 0),
            reminders: EventReminders {
                email: true,
                sms: false,
                push: true,
                reminder_time: 30,
            },
            notes: Some("Progression satisfaisante, objectifs atteints".to_string()),
        },
        Event {
            id: "3".to_string(),
            title: "Atelier CV et Lettre de Motivation".to_string(),
            description: Some("Atelier collectif pour améliorer les candidatures".to_string()),
            event_type: EventType::Workshop,
            status: EventStatus::Scheduled,
            start_date: ts(2024, 12, 20, 9, 0),
            end_date: ts(2024, 12, 20, 12, 0),
            location: Some("Salle de formation A".to_string()),
            is_virtual: false,
            meeting_link: None,
            attendees: EventAttendees {
                apprentice_id: None,
                ssp_id: Some("2".to_string()),
                admin_id: None,
                external_attendees: Some(vec!["Groupe apprentis - Promotion 2024".to_string()]),
            },
            created_by: "3".to_string(),
            created_at: ts(2024, 12, 8, 0, 0),
            updated_at: ts(2024, 12, 8, 0, 0),
            reminders: EventReminders {
                email: true,
                sms: true,
                push: true,
                reminder_time: 120,
            },
            notes: None,
        },
    ]
}

pub fn analytics() -> AnalyticsData {
    AnalyticsData {
        apprentices: ApprenticeAnalytics {
            total: 1247,
            active: 1089,
            at_risk: 89,
            completed: 69,
            by_region: vec![
                region("Île-de-France", 456),
                region("Auvergne-Rhône-Alpes", 234),
                region("Nouvelle-Aquitaine", 189),
                region("Occitanie", 156),
                region("Hauts-de-France", 134),
                region("Autres", 78),
            ],
            by_status: vec![
                status("En formation", 789),
                status("En recherche", 234),
                status("En emploi", 156),
                status("À risque", 68),
            ],
            progress_distribution: vec![
                bucket("0-25%", 123),
                bucket("26-50%", 234),
                bucket("51-75%", 456),
                bucket("76-100%", 434),
            ],
        },
        questionnaires: QuestionnaireAnalytics {
            total_responses: 3456,
            completion_rate: 87.3,
            average_score: 7.2,
            by_type: vec![
                q_type("Pré-orientation", 1234, 7.8),
                q_type("Situation personnelle", 987, 6.9),
                q_type("Compétences", 756, 7.5),
                q_type("Motivation", 479, 8.1),
            ],
            responses_trend: vec![
                monthly_responses("Jan", 234),
                monthly_responses("Fév", 267),
                monthly_responses("Mar", 298),
                monthly_responses("Avr", 312),
                monthly_responses("Mai", 345),
                monthly_responses("Jun", 389),
                monthly_responses("Jul", 423),
                monthly_responses("Aoû", 398),
                monthly_responses("Sep", 456),
                monthly_responses("Oct", 478),
                monthly_responses("Nov", 512),
                monthly_responses("Déc", 534),
            ],
        },
        events: EventAnalytics {
            total_events: 2345,
            completed_events: 1987,
            attendance_rate: 84.7,
            by_type: vec![
                e_type("Entretiens", 789, 92.3),
                e_type("Suivis", 654, 88.7),
                e_type("Ateliers", 432, 76.2),
                e_type("Réunions", 298, 81.4),
                e_type("Évaluations", 172, 95.1),
            ],
            monthly_trend: vec![
                monthly_events("Jan", 156, 134),
                monthly_events("Fév", 178, 152),
                monthly_events("Mar", 203, 176),
                monthly_events("Avr", 189, 161),
                monthly_events("Mai", 234, 198),
                monthly_events("Jun", 267, 223),
                monthly_events("Jul", 198, 167),
                monthly_events("Aoû", 145, 123),
                monthly_events("Sep", 289, 245),
                monthly_events("Oct", 312, 267),
                monthly_events("Nov", 298, 254),
                monthly_events("Déc", 276, 234),
            ],
        },
        engagement: EngagementAnalytics {
            daily_active_users: 456,
            weekly_active_users: 1234,
            monthly_active_users: 3456,
            session_duration: 18.5,
            page_views: 12456,
            user_activity_trend: vec![
                daily("01/12", 234),
                daily("02/12", 267),
                daily("03/12", 298),
                daily("04/12", 312),
                daily("05/12", 345),
                daily("06/12", 389),
                daily("07/12", 423),
                daily("08/12", 398),
                daily("09/12", 456),
                daily("10/12", 478),
                daily("11/12", 512),
                daily("12/12", 534),
            ],
        },
    }
}

fn region(region: &str, count: u32) -> RegionCount {
    RegionCount {
        region: region.to_string(),
        count,
    }
}

fn status(status: &str, count: u32) -> StatusCount {
    StatusCount {
        status: status.to_string(),
        count,
    }
}

fn bucket(range: &str, count: u32) -> ProgressBucket {
    ProgressBucket {
        range: range.to_string(),
        count,
    }
}

fn q_type(name: &str, responses: u32, avg_score: f64) -> QuestionnaireTypeStats {
    QuestionnaireTypeStats {
        questionnaire_type: name.to_string(),
        responses,
        avg_score,
    }
}

fn monthly_responses(month: &str, responses: u32) -> MonthlyResponses {
    MonthlyResponses {
        month: month.to_string(),
        responses,
    }
}

fn e_type(name: &str, count: u32, attendance: f64) -> EventTypeStats {
    EventTypeStats {
        event_type: name.to_string(),
        count,
        attendance,
    }
}

fn monthly_events(month: &str, scheduled: u32, completed: u32) -> MonthlyEvents {
    MonthlyEvents {
        month: month.to_string(),
        scheduled,
        completed,
    }
}

fn daily(date: &str, users: u32) -> DailyUsers {
    DailyUsers {
        date: date.to_string(),
        users,
    }
}
