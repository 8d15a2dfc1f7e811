//! Backend reply model
//!
//! The voice endpoint answers with a flat JSON object: always `success`
//! and `message`, plus a `type` discriminator and type-specific fields on
//! success. Decoding is lenient: an unknown `type`, or a known one with
//! missing fields, degrades to [`ReplyOutcome::Unrecognized`] so the
//! status line is still rendered and spoken.

use serde::{Deserialize, Serialize};

/// Request body for the voice endpoint
#[derive(Debug, Clone, Serialize)]
pub struct QueryBody {
    /// The recognized transcript, verbatim
    pub query: String,
}

/// A decoded backend reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    /// Human-readable summary, also the spoken text
    pub message: String,
    pub outcome: ReplyOutcome,
}

/// What the backend answered with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Ingredient list for a named recipe
    RecipeIngredients {
        recipe: String,
        recipe_slug: String,
        ingredients: Vec<String>,
    },
    /// Knowledge-base entry for one ingredient
    IngredientInfo {
        ingredient: String,
        description: String,
        storage: String,
        uses: String,
    },
    /// Successful, but nothing this client knows how to render
    Unrecognized,
    /// The backend could not answer (`success: false`)
    Failure,
}

/// Wire shape of the reply, before classification
#[derive(Debug, Deserialize)]
pub struct RawReply {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    recipe: Option<String>,
    recipe_slug: Option<String>,
    ingredients: Option<Vec<String>>,
    ingredient: Option<String>,
    description: Option<String>,
    storage: Option<String>,
    uses: Option<String>,
}

impl RawReply {
    /// Classify the raw fields into a reply
    pub fn into_reply(self) -> AssistantReply {
        if !self.success {
            return AssistantReply {
                message: self.message,
                outcome: ReplyOutcome::Failure,
            };
        }

        let outcome = match self.kind.as_deref() {
            Some("recipe_ingredients") => {
                match (self.recipe, self.recipe_slug, self.ingredients) {
                    (Some(recipe), Some(recipe_slug), Some(ingredients)) => {
                        ReplyOutcome::RecipeIngredients {
                            recipe,
                            recipe_slug,
                            ingredients,
                        }
                    }
                    _ => ReplyOutcome::Unrecognized,
                }
            }
            Some("ingredient_info") => {
                match (self.ingredient, self.description, self.storage, self.uses) {
                    (Some(ingredient), Some(description), Some(storage), Some(uses)) => {
                        ReplyOutcome::IngredientInfo {
                            ingredient,
                            description,
                            storage,
                            uses,
                        }
                    }
                    _ => ReplyOutcome::Unrecognized,
                }
            }
            _ => ReplyOutcome::Unrecognized,
        };

        AssistantReply {
            message: self.message,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> AssistantReply {
        serde_json::from_str::<RawReply>(json).unwrap().into_reply()
    }

    #[test]
    fn test_recipe_ingredients_reply() {
        let reply = decode(
            r#"{"success":true,"message":"Here you go","type":"recipe_ingredients",
                "recipe":"Pancakes","recipe_slug":"pancakes",
                "ingredients":["flour","milk","egg"]}"#,
        );
        assert_eq!(reply.message, "Here you go");
        assert_eq!(
            reply.outcome,
            ReplyOutcome::RecipeIngredients {
                recipe: "Pancakes".into(),
                recipe_slug: "pancakes".into(),
                ingredients: vec!["flour".into(), "milk".into(), "egg".into()],
            }
        );
    }

    #[test]
    fn test_ingredient_info_reply() {
        let reply = decode(
            r#"{"success":true,"message":"About garlic","type":"ingredient_info",
                "ingredient":"Garlic","description":"Flavor enhancer.",
                "storage":"Cool, dry place.","uses":"Mince or crush."}"#,
        );
        assert!(matches!(
            reply.outcome,
            ReplyOutcome::IngredientInfo { ref ingredient, .. } if ingredient == "Garlic"
        ));
    }

    #[test]
    fn test_failure_reply() {
        let reply = decode(r#"{"success":false,"message":"Sorry, try again."}"#);
        assert_eq!(reply.message, "Sorry, try again.");
        assert_eq!(reply.outcome, ReplyOutcome::Failure);
    }

    #[test]
    fn test_unknown_type_is_unrecognized() {
        let reply = decode(r#"{"success":true,"message":"ok","type":"pairing_hint"}"#);
        assert_eq!(reply.outcome, ReplyOutcome::Unrecognized);
    }

    #[test]
    fn test_known_type_with_missing_fields_degrades() {
        let reply = decode(
            r#"{"success":true,"message":"ok","type":"recipe_ingredients","recipe":"Pancakes"}"#,
        );
        assert_eq!(reply.outcome, ReplyOutcome::Unrecognized);
    }

    #[test]
    fn test_query_body_shape() {
        let body = QueryBody {
            query: "what goes in pancakes".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"query":"what goes in pancakes"}"#);
    }
}
