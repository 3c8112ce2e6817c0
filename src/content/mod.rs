//! # Local content registry
//!
//! Hand-authored text served whenever the backend cannot answer. Every
//! fallback path in [`crate::adventure`] reads from here, so a place has one
//! story, one curiosity and one set of challenges no matter which operation
//! asks for them.
//!
//! Places are looked up by their display name (exact match, as the backend and
//! the route tables spell them). Unknown places get generic templates with the
//! name interpolated.
//!
//! The route-building tables (categories, thematic routes, the classic Madrid
//! itinerary) live in [`catalog`].

pub mod catalog;

use rand::Rng;

use crate::model::Coordinates;

/// Everything the registry knows about one well-known place.
#[derive(Debug, Clone, Copy)]
pub struct PlaceContent {
    pub name: &'static str,
    pub story: &'static str,
    pub curiosity: &'static str,
    /// Short prompts; fallback challenges are drawn from these.
    pub challenges: [&'static str; 3],
    /// Longer single-challenge text used by the story-style flow.
    pub narrative_challenge: &'static str,
    pub rewards: [&'static str; 3],
}

static PLACES: [PlaceContent; 6] = [
    PlaceContent {
        name: "Plaza Mayor",
        story: "¡Hola, familia! Soy el Ratoncito Pérez y te voy a contar un secreto sobre Plaza Mayor. Esta plaza mágica ha visto pasar siglos de historia. ¿Sabías que aquí se celebraban las fiestas más importantes de Madrid? ¡Y cada piedra tiene una historia que contar!",
        curiosity: "¿Sabías que Plaza Mayor tiene forma rectangular y está rodeada de edificios con balcones desde donde la gente observaba los espectáculos?",
        challenges: [
            "Busca la estatua de Felipe III y cuenta cuántos dientes tiene el caballo",
            "Encuentra la moneda mágica escondida cerca de la estatua del rey",
            "Cuenta todas las ventanas de la plaza y encuentra la más mágica",
        ],
        narrative_challenge: "Busca la estatua de Felipe III y cuenta cuántos dientes tiene el caballo. ¡Es un secreto que solo los más observadores pueden descubrir!",
        rewards: ["Corona de rey", "Espada mágica", "Escudo dorado"],
    },
    PlaceContent {
        name: "Puerta del Sol",
        story: "¡Buenos días! Soy el Ratoncito Pérez. Puerta del Sol es el corazón de Madrid, donde todos los caminos se encuentran. Aquí está el kilómetro cero, el punto desde donde se miden todas las distancias de España. ¡Es un lugar lleno de magia y energía!",
        curiosity: "¿Sabías que en Puerta del Sol está el reloj que marca las campanadas de fin de año para toda España?",
        challenges: [
            "Encuentra el kilómetro cero y salta sobre él tres veces",
            "Busca la estatua del Oso y el Madroño y cuéntale un secreto",
            "Encuentra el reloj de la Puerta del Sol y dime qué hora marca",
        ],
        narrative_challenge: "Encuentra el kilómetro cero y salta sobre él tres veces. ¡Cada salto te dará un deseo mágico!",
        rewards: ["Reloj mágico", "Estrella brillante", "Moneda del tiempo"],
    },
    PlaceContent {
        name: "Palacio Real",
        story: "¡Saludos, pequeños exploradores! Soy el Ratoncito Pérez. El Palacio Real es la residencia oficial de los reyes de España. ¿Sabías que tiene más de 3,000 habitaciones? ¡Y cada una guarda secretos y tesoros increíbles!",
        curiosity: "¿Sabías que el Palacio Real tiene una colección de violines Stradivarius, los instrumentos más valiosos del mundo?",
        challenges: [
            "Busca el trono real y imagina que eres rey por un día",
            "Cuenta cuántas banderas hay en el palacio",
            "Encuentra el escudo de armas y descríbelo",
        ],
        narrative_challenge: "Busca el escudo de armas en la fachada y cuenta cuántos elementos diferentes puedes identificar.",
        rewards: ["Corona real", "Cetro mágico", "Anillo del poder"],
    },
    PlaceContent {
        name: "Parque del Retiro",
        story: "¡Hola, aventureros! Soy el Ratoncito Pérez. El Retiro es mi parque favorito de Madrid. Aquí los árboles susurran historias antiguas y el estanque guarda secretos mágicos. ¡Es un lugar perfecto para soñar y jugar!",
        curiosity: "¿Sabías que el Retiro tiene un árbol que tiene más de 400 años y es uno de los más antiguos de Madrid?",
        challenges: [
            "Encuentra el Palacio de Cristal y busca tu reflejo mágico",
            "Cuenta cuántos patos hay en el estanque",
            "Busca el árbol más alto del parque y abrázalo",
        ],
        narrative_challenge: "Encuentra el Palacio de Cristal y busca tu reflejo mágico en el agua.",
        rewards: ["Hoja mágica", "Flor encantada", "Semilla de sueños"],
    },
    PlaceContent {
        name: "Museo del Prado",
        story: "¡Buenos días, artistas! Soy el Ratoncito Pérez. El Prado es como una máquina del tiempo llena de arte. Aquí puedes viajar a través de la historia viendo cuadros increíbles. ¡Cada pintura tiene una historia mágica que contar!",
        curiosity: "¿Sabías que el Prado tiene más de 8,000 cuadros, pero solo se pueden ver unos 1,300 a la vez?",
        challenges: [
            "Encuentra el cuadro de Las Meninas y cuenta cuántas personas hay",
            "Busca un cuadro con un gato y cuéntame su historia",
            "Encuentra el cuadro más grande del museo",
        ],
        narrative_challenge: "Busca un cuadro con un gato y cuéntame qué está haciendo ese gato mágico.",
        rewards: ["Pincel mágico", "Cuadro en miniatura", "Paleta de colores"],
    },
    PlaceContent {
        name: "Mercado de San Miguel",
        story: "¡Hola, pequeños cocineros! Soy el Ratoncito Pérez. El Mercado de San Miguel es una caja de hierro y cristal llena de sabores. Aquí venían los madrileños a comprar desde hace más de cien años. ¡Cada puesto esconde una receta mágica!",
        curiosity: "¿Sabías que el Mercado de San Miguel se inauguró en 1916 y su estructura de hierro es una de las pocas que quedan en Madrid?",
        challenges: [
            "Prueba un pincho de jamón ibérico y describe su sabor",
            "Cuenta cuántos puestos de comida hay en el mercado",
            "Encuentra el puesto más colorido y toma una foto",
        ],
        narrative_challenge: "Busca el puesto más colorido del mercado y descubre qué ingrediente mágico esconde.",
        rewards: ["Pincho mágico", "Receta secreta", "Sabor especial"],
    },
];

/// Rewards any place can hand out.
pub const BASE_REWARDS: [&str; 4] = [
    "Moneda mágica del Ratoncito Pérez",
    "Diente de oro brillante",
    "Tesoro escondido",
    "Poder mágico especial",
];

/// Look up a known place by display name.
pub fn place_content(place_name: &str) -> Option<&'static PlaceContent> {
    PLACES.iter().find(|p| p.name == place_name)
}

/// Names of every place with hand-authored content.
pub fn known_places() -> impl Iterator<Item = &'static str> {
    PLACES.iter().map(|p| p.name)
}

pub fn story_for(place_name: &str) -> String {
    match place_content(place_name) {
        Some(content) => content.story.to_string(),
        None => format!(
            "¡Hola, familia! Soy el Ratoncito Pérez y te voy a contar una historia mágica sobre {}. Este lugar especial está lleno de secretos y aventuras esperando ser descubiertos. ¡Vamos a explorarlo juntos!",
            place_name
        ),
    }
}

pub fn curiosity_for(place_name: &str) -> String {
    match place_content(place_name) {
        Some(content) => content.curiosity.to_string(),
        None => format!(
            "¿Sabías que {} tiene secretos mágicos esperando ser descubiertos?",
            place_name
        ),
    }
}

/// The three short challenge prompts for a place.
pub fn challenge_prompts(place_name: &str) -> Vec<String> {
    match place_content(place_name) {
        Some(content) => content.challenges.iter().map(|c| c.to_string()).collect(),
        None => vec![
            format!("Explora {} y encuentra algo mágico", place_name),
            format!("Busca en {} un detalle que nadie más haya notado", place_name),
            format!("Cuenta algo interesante que veas en {}", place_name),
        ],
    }
}

/// One of [`challenge_prompts`], picked at random.
pub fn random_challenge(place_name: &str) -> String {
    let mut prompts = challenge_prompts(place_name);
    let mut rng = rand::thread_rng();
    let idx = rng.gen_range(0..prompts.len());
    prompts.swap_remove(idx)
}

pub fn narrative_challenge_for(place_name: &str) -> String {
    match place_content(place_name) {
        Some(content) => content.narrative_challenge.to_string(),
        None => format!(
            "Explora {} y encuentra algo mágico que nadie más haya notado. ¡Tu misión es descubrir el secreto más especial del lugar!",
            place_name
        ),
    }
}

/// Place-specific rewards; empty for unknown places.
pub fn place_rewards(place_name: &str) -> &'static [&'static str] {
    place_content(place_name)
        .map(|content| &content.rewards[..])
        .unwrap_or(&[])
}

/// Narrative pieces for an adventure started at an arbitrary position.
#[derive(Debug, Clone, PartialEq)]
pub struct AdventureTemplate {
    pub title: &'static str,
    pub story: String,
    pub challenge: &'static str,
    pub curiosity: &'static str,
    pub reward: &'static str,
    pub location: &'static str,
    pub duration: &'static str,
    pub difficulty: &'static str,
    pub age_range: &'static str,
}

/// Local adventure for `location`; the story echoes the coordinates to 4 decimals.
pub fn gps_adventure(location: Coordinates) -> AdventureTemplate {
    AdventureTemplate {
        title: "Aventura GPS del Ratoncito Pérez",
        story: format!(
            "¡Hola! Soy el Ratoncito Pérez y veo que estás en las coordenadas {:.4}, {:.4}. Te voy a contar una historia mágica sobre este lugar especial de Madrid.",
            location.latitude, location.longitude
        ),
        challenge: "Busca en tu casa un diente que se te haya caído recientemente. Si no tienes ninguno, ¡puedes usar un diente de leche imaginario!",
        curiosity: "¿Sabías que el Ratoncito Pérez nació en Madrid en 1894? Fue creado por el escritor Luis Coloma para consolar al futuro rey Alfonso XIII cuando perdió su primer diente.",
        reward: "Por completar esta aventura, ganarás 30 puntos y 4 monedas mágicas. ¡Sigue explorando para conseguir más recompensas!",
        location: "Madrid, España",
        duration: "15-20 minutos",
        difficulty: "Fácil",
        age_range: "3-12 años",
    }
}

static CHAT_RESPONSES: [&str; 5] = [
    "¡Hola! Soy el Ratoncito Pérez. ¿En qué puedo ayudarte en tu aventura por Madrid?",
    "¡Qué pregunta tan interesante! Déjame pensar en una historia mágica...",
    "¡Excelente pregunta! Como Ratoncito Pérez, te puedo contar muchas cosas mágicas sobre este lugar.",
    "¡Hola! Estoy aquí para ayudarte con tu aventura en Madrid. ¿Qué te gustaría saber?",
    "¡Qué divertido! Me encanta cuando los niños hacen preguntas. Te voy a contar algo especial...",
];

static CHAT_EXAMPLES: [&str; 5] = [
    "Cuéntame una historia sobre este lugar",
    "¿Qué secretos esconde este sitio?",
    "¿Cómo llegaste aquí, Ratoncito?",
    "¿Qué puedo hacer en este lugar?",
    "¿Tienes alguna aventura para mí?",
];

/// Random canned chatbot reply.
pub fn chat_response() -> &'static str {
    let mut rng = rand::thread_rng();
    let idx = rng.gen_range(0..CHAT_RESPONSES.len());
    CHAT_RESPONSES[idx]
}

pub fn chat_responses() -> &'static [&'static str] {
    &CHAT_RESPONSES
}

pub fn chat_examples() -> Vec<String> {
    CHAT_EXAMPLES.iter().map(|s| s.to_string()).collect()
}
