//! Rule-based travel advisor
//!
//! A flat keyword-matching decision tree that annotates predictions
//! with travel tips. Pure function of (message, context); no hidden
//! state between calls.

use serde::{Deserialize, Serialize};

/// Facts about the conversation the advisor may reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvisorContext {
    pub last_route: Option<String>,
    pub last_price: Option<f64>,
}

/// Advisor reply; `done` signals the conversation should end.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Advice {
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    CheapDays,
    Season,
    Baggage,
    Stops,
    Route,
    Farewell,
    Unknown,
}

fn classify(message: &str) -> Topic {
    let msg = message.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| msg.contains(w));

    if has(&["adiós", "adios", "chau", "gracias", "bye"]) {
        Topic::Farewell
    } else if has(&["barato", "económico", "economico", "ahorr", "cheap"]) {
        Topic::CheapDays
    } else if has(&["temporada", "julio", "diciembre", "feriado", "season"]) {
        Topic::Season
    } else if has(&["equipaje", "maleta", "baggage"]) {
        Topic::Baggage
    } else if has(&["escala", "directo", "stops"]) {
        Topic::Stops
    } else if has(&["ruta", "destino", "route"]) {
        Topic::Route
    } else {
        Topic::Unknown
    }
}

/// Produce a reply for one advisor message.
pub fn advise(message: &str, context: &AdvisorContext) -> Advice {
    let text = match classify(message) {
        Topic::CheapDays => {
            "Los vuelos de martes y miércoles suelen ser los más baratos. \
             Evita viernes y domingo, que llevan recargo de fin de semana."
                .to_string()
        }
        Topic::Season => {
            "Julio y diciembre son temporada alta en el Perú (fiestas patrias \
             y fin de año); espera tarifas hasta 25% más altas."
                .to_string()
        }
        Topic::Baggage => {
            "Las tarifas \"Solo equipaje de mano\" son las más económicas. \
             Si llevas maleta, busca la etiqueta \"Incluye equipaje\"."
                .to_string()
        }
        Topic::Stops => {
            "Los vuelos directos dominan las rutas domésticas; una escala \
             rara vez abarata el pasaje y alarga bastante el viaje."
                .to_string()
        }
        Topic::Route => match &context.last_route {
            Some(route) => format!(
                "Tu última consulta fue la ruta {route}. Prueba fechas \
                 cercanas entre semana para comparar precios."
            ),
            None => "Aún no has consultado ninguna ruta. Pide una predicción \
                     primero y te daré consejos sobre ella."
                .to_string(),
        },
        Topic::Farewell => "¡Buen viaje! Vuelve cuando necesites otra estimación.".to_string(),
        Topic::Unknown => match context.last_price {
            Some(price) => format!(
                "Puedo ayudarte con días baratos, temporadas, equipaje o \
                 escalas. Tu última estimación fue S/ {price:.2}."
            ),
            None => "Puedo ayudarte con días baratos, temporadas, equipaje o \
                     escalas. ¿Sobre qué quieres saber?"
                .to_string(),
        },
    };

    Advice {
        text,
        done: classify(message) == Topic::Farewell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cheap_days_keyword() {
        let advice = advise("¿cuándo es más barato volar?", &AdvisorContext::default());
        assert!(advice.text.contains("martes"));
        assert!(!advice.done);
    }

    #[test]
    fn test_farewell_terminates() {
        let advice = advise("gracias, adiós", &AdvisorContext::default());
        assert!(advice.done);
    }

    #[test]
    fn test_route_uses_context() {
        let context = AdvisorContext {
            last_route: Some("LIM-CUZ".to_string()),
            last_price: None,
        };
        let advice = advise("dime algo de mi ruta", &context);
        assert!(advice.text.contains("LIM-CUZ"));
    }

    #[test]
    fn test_unknown_message_mentions_last_price() {
        let context = AdvisorContext {
            last_route: None,
            last_price: Some(312.5),
        };
        let advice = advise("hola", &context);
        assert!(advice.text.contains("312.50"));
        assert!(!advice.done);
    }

    #[test]
    fn test_is_pure() {
        let context = AdvisorContext::default();
        assert_eq!(advise("equipaje", &context), advise("equipaje", &context));
    }
}
