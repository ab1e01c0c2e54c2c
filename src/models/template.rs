use serde::Serialize;

use super::workout::WorkoutType;

/// One exercise slot in a built-in workout template. MET values are
/// per-exercise so the calorie estimate tracks what is actually being
/// performed, not just the workout's overall type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateExercise {
    pub name: &'static str,
    pub sets: u32,
    pub reps: u32,
    pub rest_secs: u32,
    pub met: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct WorkoutTemplate {
    pub id: u32,
    pub name: &'static str,
    pub duration_mins: u32,
    pub difficulty: &'static str,
    pub workout_type: WorkoutType,
    pub exercises: &'static [TemplateExercise],
}

impl WorkoutTemplate {
    pub fn find(id: u32) -> Option<&'static WorkoutTemplate> {
        TEMPLATES.iter().find(|t| t.id == id)
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }

    pub fn difficulty_icon(&self) -> &'static str {
        match self.difficulty.to_ascii_lowercase().as_str() {
            "beginner" => "\u{1F331}",
            "intermediate" => "\u{1F4AA}",
            "advanced" => "\u{1F525}",
            _ => "\u{26A1}",
        }
    }
}

pub const TEMPLATES: &[WorkoutTemplate] = &[
    WorkoutTemplate {
        id: 1,
        name: "Lower Body",
        duration_mins: 45,
        difficulty: "Moderate",
        workout_type: WorkoutType::Strength,
        exercises: &[
            TemplateExercise { name: "Squats", sets: 4, reps: 12, rest_secs: 60, met: 6.0 },
            TemplateExercise { name: "Lunges", sets: 3, reps: 10, rest_secs: 45, met: 5.5 },
            TemplateExercise { name: "Romanian Deadlift", sets: 4, reps: 10, rest_secs: 90, met: 6.5 },
            TemplateExercise { name: "Bulgarian Split Squats", sets: 3, reps: 8, rest_secs: 60, met: 6.0 },
            TemplateExercise { name: "Calf Raises", sets: 3, reps: 15, rest_secs: 30, met: 4.0 },
            TemplateExercise { name: "Wall Sit", sets: 3, reps: 30, rest_secs: 45, met: 5.0 },
        ],
    },
    WorkoutTemplate {
        id: 2,
        name: "Upper Body Push",
        duration_mins: 40,
        difficulty: "Intermediate",
        workout_type: WorkoutType::Strength,
        exercises: &[
            TemplateExercise { name: "Push-ups", sets: 4, reps: 12, rest_secs: 60, met: 6.0 },
            TemplateExercise { name: "Overhead Press", sets: 4, reps: 8, rest_secs: 90, met: 6.5 },
            TemplateExercise { name: "Dips", sets: 3, reps: 10, rest_secs: 60, met: 6.0 },
            TemplateExercise { name: "Pike Push-ups", sets: 3, reps: 8, rest_secs: 45, met: 5.5 },
            TemplateExercise { name: "Tricep Extensions", sets: 3, reps: 12, rest_secs: 45, met: 4.5 },
        ],
    },
    WorkoutTemplate {
        id: 3,
        name: "Full Body HIIT",
        duration_mins: 30,
        difficulty: "Advanced",
        workout_type: WorkoutType::Hiit,
        exercises: &[
            TemplateExercise { name: "Burpees", sets: 4, reps: 8, rest_secs: 30, met: 10.0 },
            TemplateExercise { name: "Mountain Climbers", sets: 4, reps: 20, rest_secs: 30, met: 9.0 },
            TemplateExercise { name: "Jump Squats", sets: 4, reps: 12, rest_secs: 30, met: 8.5 },
            TemplateExercise { name: "High Knees", sets: 3, reps: 30, rest_secs: 30, met: 8.0 },
            TemplateExercise { name: "Plank Jacks", sets: 3, reps: 15, rest_secs: 30, met: 7.5 },
            TemplateExercise { name: "Russian Twists", sets: 3, reps: 20, rest_secs: 30, met: 6.0 },
            TemplateExercise { name: "Jump Lunges", sets: 3, reps: 12, rest_secs: 30, met: 8.0 },
            TemplateExercise { name: "Bear Crawl", sets: 3, reps: 10, rest_secs: 30, met: 7.0 },
        ],
    },
    WorkoutTemplate {
        id: 4,
        name: "Core & Stability",
        duration_mins: 25,
        difficulty: "Beginner",
        workout_type: WorkoutType::Core,
        exercises: &[
            TemplateExercise { name: "Plank", sets: 3, reps: 30, rest_secs: 45, met: 4.5 },
            TemplateExercise { name: "Dead Bug", sets: 3, reps: 10, rest_secs: 30, met: 3.5 },
            TemplateExercise { name: "Bird Dog", sets: 3, reps: 8, rest_secs: 30, met: 3.0 },
            TemplateExercise { name: "Side Plank", sets: 2, reps: 20, rest_secs: 45, met: 4.0 },
            TemplateExercise { name: "Glute Bridge", sets: 3, reps: 15, rest_secs: 30, met: 4.0 },
            TemplateExercise { name: "Cat-Cow Stretch", sets: 2, reps: 10, rest_secs: 30, met: 2.5 },
        ],
    },
];
