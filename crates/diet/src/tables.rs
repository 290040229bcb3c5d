//! Fixed keyword vocabularies for dietary classification.
//!
//! These tables are part of the classifier contract: historical match
//! decisions depend on them, so entries must not be edited casually.
//! All entries are lowercase; matching is plain substring containment
//! against lowercased input.

/// Any hit here classifies the text as non-vegetarian immediately,
/// before any other scoring. Root words for meat, fish, seafood, and
/// unambiguous egg dishes, plus explicit "non-veg" phrasings.
pub const STRONG_NON_VEG: &[&str] = &[
    "non-veg",
    "non veg",
    "nonveg",
    "chicken",
    "murg",
    "mutton",
    "gosht",
    "lamb",
    "beef",
    "pork",
    "bacon",
    "ham ",
    "sausage",
    "salami",
    "pepperoni",
    "keema",
    "kheema",
    "turkey",
    "duck",
    "quail",
    "venison",
    "fish",
    "machli",
    "prawn",
    "shrimp",
    "crab",
    "lobster",
    "squid",
    "octopus",
    "oyster",
    "tuna",
    "salmon",
    "pomfret",
    "sardine",
    "anchovy",
    "mackerel",
    "seafood",
    "egg curry",
    "boiled egg",
    "scrambled egg",
    "fried egg",
    "egg bhurji",
    "omelette",
    "omelet",
    "anda",
];

/// Any hit here (after the strong non-veg check) classifies the text as
/// vegetarian immediately.
pub const STRONG_VEG: &[&str] = &[
    "vegetarian",
    "pure veg",
    "vegan",
    "jain",
    "sattvic",
    "satvik",
    "plant-based",
    "plant based",
    "meatless",
];

/// Counted vegetarian indicators: vegetables, pulses, dairy, grains,
/// vegetarian dish names, fruits, and beverages.
pub const VEG_INDICATORS: &[&str] = &[
    // vegetables
    "vegetable",
    "veggie",
    "aloo",
    "potato",
    "gobi",
    "cauliflower",
    "bhindi",
    "okra",
    "baingan",
    "brinjal",
    "eggplant",
    "palak",
    "spinach",
    "methi",
    "saag",
    "matar",
    "peas",
    "mushroom",
    "corn",
    "tomato",
    "onion",
    "carrot",
    "beans",
    "cabbage",
    "capsicum",
    "beetroot",
    "pumpkin",
    "bottle gourd",
    "lauki",
    "tinda",
    "karela",
    // pulses
    "dal",
    "daal",
    "lentil",
    "chana",
    "chole",
    "rajma",
    "moong",
    "toor",
    "urad",
    "sprouts",
    // dairy
    "paneer",
    "tofu",
    "curd",
    "dahi",
    "yogurt",
    "yoghurt",
    "lassi",
    "milk",
    "butter",
    "ghee",
    "cheese",
    "cream",
    "khoya",
    // grains and breads
    "rice",
    "pulao",
    "khichdi",
    "roti",
    "naan",
    "paratha",
    "chapati",
    "puri",
    "thepla",
    "oats",
    "quinoa",
    "upma",
    "poha",
    // vegetarian dish names
    "idli",
    "dosa",
    "uttapam",
    "vada",
    "sambar",
    "sambhar",
    "rasam",
    "avial",
    "kootu",
    "poriyal",
    "dhokla",
    "khandvi",
    "pakora",
    "bhaji",
    "bhajiya",
    "samosa",
    "kachori",
    "chaat",
    "pani puri",
    "misal",
    "pav bhaji",
    "sabzi",
    "sabji",
    "subzi",
    "bharta",
    "salad",
    "raita",
    // sweets
    "rasgulla",
    "gulab jamun",
    "jalebi",
    "halwa",
    "kheer",
    "barfi",
    "ladoo",
    "laddu",
    // fruits
    "fruit",
    "apple",
    "banana",
    "mango",
    "grape",
    "pomegranate",
    "papaya",
    "guava",
    "watermelon",
    "pineapple",
    "berry",
    // beverages
    "juice",
    "smoothie",
    "sharbat",
    "chaas",
    "tea",
    "coffee",
];

/// Counted non-vegetarian indicators: generic meat/egg terms and dish
/// names that usually carry meat but are not certain enough for the
/// strong list.
pub const NON_VEG_INDICATORS: &[&str] = &[
    "meat",
    "egg",
    "kaleji",
    "liver",
    "shawarma",
    "sushi",
    "wings",
    "drumette",
    "tangdi",
    "seekh",
    "halim",
    "bhuna ghost",
];
